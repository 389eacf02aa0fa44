use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validators::{
    validate_for_create, validate_for_update, ProductCreateFields, ProductFields,
    ProductUpdateFields,
};
use crate::common::{Request, Validatable, ValidationError, ValidationErrors};
use crate::store::Document;

// ============================================================================
// Product Document
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_file: String,
    pub price: f64,
    pub category: Vec<String>,
    /// Managed by the document store
    #[serde(default)]
    pub version: u32,
}

impl Product {
    /// Build a new product with a fresh id; fails with every violation found
    pub fn create<T>(request: &T) -> Result<Self, ValidationError>
    where
        T: ProductCreateFields + ?Sized,
    {
        request.validate_and_raise()?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: request.name().to_string(),
            description: request.description().to_string(),
            image_file: request.image_file().to_string(),
            price: request.price(),
            category: request.category().to_vec(),
            version: 0,
        })
    }

    /// Replace the editable fields; leaves the product untouched on failure
    pub fn update<T>(&mut self, request: &T) -> Result<(), ValidationError>
    where
        T: ProductUpdateFields + ?Sized,
    {
        request.validate_and_raise()?;

        self.name = request.name().to_string();
        self.description = request.description().to_string();
        self.image_file = request.image_file().to_string();
        self.price = request.price();
        self.category = request.category().to_vec();

        Ok(())
    }
}

impl Document for Product {
    const TABLE: &'static str = "products";
    const INDEXED_FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn set_version(&mut self, version: u32) {
        self.version = version;
    }
}

// ============================================================================
// Create
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub image_file: String,
    pub price: f64,
    pub category: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateProductCommand {
    pub name: String,
    pub description: String,
    pub image_file: String,
    pub price: f64,
    pub category: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductResult {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub id: Uuid,
}

impl Request for CreateProductCommand {
    type Response = CreateProductResult;
}

impl From<CreateProductRequest> for CreateProductCommand {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            image_file: request.image_file,
            price: request.price,
            category: request.category,
        }
    }
}

impl From<CreateProductResult> for CreateProductResponse {
    fn from(result: CreateProductResult) -> Self {
        Self { id: result.id }
    }
}

impl Validatable for CreateProductCommand {
    fn validate(&self, errors: &mut ValidationErrors) -> bool {
        validate_for_create(self, errors)
    }
}

impl ProductFields for CreateProductCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn image_file(&self) -> &str {
        &self.image_file
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn category(&self) -> &[String] {
        &self.category
    }
}

impl ProductCreateFields for CreateProductCommand {}

// ============================================================================
// Update
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProductRequest {
    pub id: Uuid,
    pub version: u32,
    pub name: String,
    pub description: String,
    pub image_file: String,
    pub price: f64,
    pub category: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProductCommand {
    pub id: Uuid,
    pub version: u32,
    pub name: String,
    pub description: String,
    pub image_file: String,
    pub price: f64,
    pub category: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductResult {
    pub id: Uuid,
    pub version: u32,
}

#[derive(Debug, Serialize)]
pub struct UpdateProductResponse {
    pub id: Uuid,
    pub version: u32,
}

impl Request for UpdateProductCommand {
    type Response = UpdateProductResult;
}

impl From<UpdateProductRequest> for UpdateProductCommand {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            id: request.id,
            version: request.version,
            name: request.name,
            description: request.description,
            image_file: request.image_file,
            price: request.price,
            category: request.category,
        }
    }
}

impl From<UpdateProductResult> for UpdateProductResponse {
    fn from(result: UpdateProductResult) -> Self {
        Self {
            id: result.id,
            version: result.version,
        }
    }
}

impl Validatable for UpdateProductCommand {
    fn validate(&self, errors: &mut ValidationErrors) -> bool {
        validate_for_update(self, errors)
    }
}

impl ProductFields for UpdateProductCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn image_file(&self) -> &str {
        &self.image_file
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn category(&self) -> &[String] {
        &self.category
    }
}

impl ProductUpdateFields for UpdateProductCommand {
    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> u32 {
        self.version
    }
}

// ============================================================================
// Delete
// ============================================================================

#[derive(Debug, Clone)]
pub struct DeleteProductByIdCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteProductByIdResult {
    pub is_success: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteProductByIdResponse {
    pub is_success: bool,
}

impl Request for DeleteProductByIdCommand {
    type Response = DeleteProductByIdResult;
}

impl From<DeleteProductByIdResult> for DeleteProductByIdResponse {
    fn from(result: DeleteProductByIdResult) -> Self {
        Self {
            is_success: result.is_success,
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetAllProductsParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct GetAllProductsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct GetAllProductsResult {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct GetAllProductsResponse {
    pub products: Vec<Product>,
}

impl Request for GetAllProductsQuery {
    type Response = GetAllProductsResult;
}

impl From<GetAllProductsParams> for GetAllProductsQuery {
    fn from(params: GetAllProductsParams) -> Self {
        Self {
            page: params.page,
            page_size: params.page_size,
        }
    }
}

impl From<GetAllProductsResult> for GetAllProductsResponse {
    fn from(result: GetAllProductsResult) -> Self {
        Self {
            products: result.products,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetProductByIdQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone)]
pub struct GetProductByIdResult {
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct GetProductByIdResponse {
    pub product: Product,
}

impl Request for GetProductByIdQuery {
    type Response = GetProductByIdResult;
}

impl From<GetProductByIdResult> for GetProductByIdResponse {
    fn from(result: GetProductByIdResult) -> Self {
        Self {
            product: result.product,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetProductsByCategoryQuery {
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct GetProductsByCategoryResult {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct GetProductsByCategoryResponse {
    pub products: Vec<Product>,
}

impl Request for GetProductsByCategoryQuery {
    type Response = GetProductsByCategoryResult;
}

impl From<GetProductsByCategoryResult> for GetProductsByCategoryResponse {
    fn from(result: GetProductsByCategoryResult) -> Self {
        Self {
            products: result.products,
        }
    }
}
