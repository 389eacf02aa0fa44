// src/products/validators.rs

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::common::validation::{
    validate_max_length, validate_max_value, validate_min_length, validate_min_value,
    validate_not_empty, validate_not_empty_items, validate_pattern,
};
use crate::common::{Validatable, ValidationErrors};

pub const NAME_MIN_LENGTH: usize = 3;
pub const NAME_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 500;
pub const PRICE_MIN: f64 = 0.01;
pub const PRICE_MAX: f64 = 10000.0;

pub const IMAGE_FILE_MESSAGE: &str = "Image file must be a valid image (jpg, png, gif)";
pub const PRODUCT_ID_REQUIRED_MESSAGE: &str = "Product ID is required";
pub const INVALID_VERSION_MESSAGE: &str = "Invalid version";

static IMAGE_FILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(jpg|png|gif)$").expect("image file pattern is valid"));

// ============================================================================
// Product Capabilities
// ============================================================================

/// Fields every product operation carries
pub trait ProductFields: Validatable {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn image_file(&self) -> &str;
    fn price(&self) -> f64;
    fn category(&self) -> &[String];
}

/// Input accepted by `Product::create`
pub trait ProductCreateFields: ProductFields {}

/// Input accepted by `Product::update`
pub trait ProductUpdateFields: ProductFields {
    fn id(&self) -> Uuid;
    fn version(&self) -> u32;
}

// ============================================================================
// Product Contracts
// ============================================================================

/// Rules shared by create and update
pub fn validate_base_product<T>(model: &T, errors: &mut ValidationErrors)
where
    T: ProductFields + ?Sized,
{
    validate_not_empty(model.name(), "Name", errors);
    validate_min_length(model.name(), NAME_MIN_LENGTH, "Name", errors);
    validate_max_length(model.name(), NAME_MAX_LENGTH, "Name", errors);

    validate_not_empty(model.description(), "Description", errors);
    validate_max_length(model.description(), DESCRIPTION_MAX_LENGTH, "Description", errors);

    validate_min_value(model.price(), PRICE_MIN, "Price", errors);
    validate_max_value(model.price(), PRICE_MAX, "Price", errors);

    validate_not_empty_items(model.category(), "Category", errors);
}

pub fn validate_for_create<T>(model: &T, errors: &mut ValidationErrors) -> bool
where
    T: ProductCreateFields + ?Sized,
{
    validate_base_product(model, errors);

    validate_not_empty(model.image_file(), "ImageFile", errors);
    validate_image_file(model.image_file(), errors);

    errors.is_empty()
}

pub fn validate_for_update<T>(model: &T, errors: &mut ValidationErrors) -> bool
where
    T: ProductUpdateFields + ?Sized,
{
    validate_base_product(model, errors);

    validate_image_file(model.image_file(), errors);

    if model.id().is_nil() {
        errors.push(PRODUCT_ID_REQUIRED_MESSAGE.to_string());
    }

    if model.version() < 1 {
        errors.push(INVALID_VERSION_MESSAGE.to_string());
    }

    errors.is_empty()
}

fn validate_image_file(image_file: &str, errors: &mut ValidationErrors) -> bool {
    validate_pattern(
        image_file,
        &IMAGE_FILE_PATTERN,
        "ImageFile",
        Some(IMAGE_FILE_MESSAGE),
        errors,
    )
}
