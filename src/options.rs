//! Valid input vocabularies for the prediction form, read straight from the
//! loaded label encoders in encoder-native order.

use serde::Serialize;

use crate::error::ApiError;
use crate::model::{ModelState, FIELD_COUNTRY, FIELD_COURSE_TYPE, FIELD_SPECIALIZATION};

#[derive(Debug, Serialize)]
pub struct FeeOptions {
    pub countries: Vec<String>,
    pub course_types: Vec<String>,
    pub specializations: Vec<String>,
}

/// List the known values per field. Order must match the training-time
/// encoder ordering exactly; it is the vocabulary users pick from.
pub fn get_options(model: &ModelState) -> Result<FeeOptions, ApiError> {
    if model.reference.is_none() || model.encoders.is_empty() {
        return Err(ApiError::DataUnavailable);
    }
    Ok(FeeOptions {
        countries: classes_for(model, FIELD_COUNTRY)?,
        course_types: classes_for(model, FIELD_COURSE_TYPE)?,
        specializations: classes_for(model, FIELD_SPECIALIZATION)?,
    })
}

fn classes_for(model: &ModelState, field: &str) -> Result<Vec<String>, ApiError> {
    model
        .encoder(field)
        .map(|enc| enc.classes().to_vec())
        .ok_or_else(|| ApiError::OptionsUnavailable(field.to_string()))
}
