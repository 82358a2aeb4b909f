//! Fee prediction: validate the three categorical inputs, encode them with
//! the training-time label encoders, and query the estimator. Every call
//! re-encodes and re-predicts; there is no caching and no hidden state.

use crate::error::ApiError;
use crate::model::{ModelState, FIELD_COUNTRY, FIELD_COURSE_TYPE, FIELD_SPECIALIZATION};

/// Predict a course fee, rounded to 2 decimal places.
///
/// A prediction is only attempted once all three inputs encode against
/// their encoders; an unknown value is a hard rejection with no fallback.
pub fn predict_fee(
    model: &ModelState,
    country: &str,
    course_type: &str,
    specialization: &str,
) -> Result<f64, ApiError> {
    let estimator = model.estimator.as_ref().ok_or(ApiError::ModelNotLoaded)?;

    if country.is_empty() || course_type.is_empty() || specialization.is_empty() {
        return Err(ApiError::MissingInput);
    }

    // Fixed feature order: [country, course type, specialization].
    let row = [
        encode(model, FIELD_COUNTRY, country)? as f64,
        encode(model, FIELD_COURSE_TYPE, course_type)? as f64,
        encode(model, FIELD_SPECIALIZATION, specialization)? as f64,
    ];

    let fee = estimator
        .predict(&row)
        .map_err(|e| ApiError::Prediction(e.to_string()))?;
    Ok(round2(fee))
}

fn encode(model: &ModelState, field: &str, value: &str) -> Result<usize, ApiError> {
    let encoder = model
        .encoder(field)
        .ok_or_else(|| ApiError::EncoderMissing(field.to_string()))?;
    encoder.transform(value).ok_or(ApiError::InvalidValue)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeeEstimator, LabelEncoder, ReferenceTable};
    use std::collections::HashMap;

    fn loaded_model() -> ModelState {
        let mut encoders = HashMap::new();
        encoders.insert(
            FIELD_COUNTRY.to_string(),
            LabelEncoder::new(["Canada", "UK", "USA"]),
        );
        encoders.insert(
            FIELD_COURSE_TYPE.to_string(),
            LabelEncoder::new(["Bachelors", "Masters"]),
        );
        encoders.insert(
            FIELD_SPECIALIZATION.to_string(),
            LabelEncoder::new(["Computer Science", "Data Science"]),
        );
        ModelState {
            estimator: Some(FeeEstimator {
                n_neighbors: 1,
                points: vec![[2.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
                fees: vec![45000.456, 21000.0],
            }),
            reference: Some(ReferenceTable::default()),
            encoders,
        }
    }

    #[test]
    fn known_inputs_predict_and_round_to_two_decimals() {
        let model = loaded_model();
        let fee = predict_fee(&model, "USA", "Masters", "Computer Science").unwrap();
        assert_eq!(fee, 45000.46);
    }

    #[test]
    fn prediction_is_idempotent() {
        let model = loaded_model();
        let a = predict_fee(&model, "Canada", "Bachelors", "Data Science").unwrap();
        let b = predict_fee(&model, "Canada", "Bachelors", "Data Science").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_is_missing_input() {
        let model = loaded_model();
        assert_eq!(
            predict_fee(&model, "", "Masters", "Computer Science"),
            Err(ApiError::MissingInput)
        );
        assert_eq!(
            predict_fee(&model, "USA", "Masters", ""),
            Err(ApiError::MissingInput)
        );
    }

    #[test]
    fn unknown_value_is_invalid_value() {
        let model = loaded_model();
        assert_eq!(
            predict_fee(&model, "Atlantis", "Masters", "Computer Science"),
            Err(ApiError::InvalidValue)
        );
    }

    #[test]
    fn missing_encoder_names_the_field() {
        let mut model = loaded_model();
        model.encoders.remove(FIELD_COURSE_TYPE);
        assert_eq!(
            predict_fee(&model, "USA", "Masters", "Computer Science"),
            Err(ApiError::EncoderMissing(FIELD_COURSE_TYPE.to_string()))
        );
    }

    #[test]
    fn no_estimator_is_model_not_loaded() {
        let model = ModelState::degraded();
        assert_eq!(
            predict_fee(&model, "USA", "Masters", "Computer Science"),
            Err(ApiError::ModelNotLoaded)
        );
    }

    #[test]
    fn estimator_check_precedes_input_validation() {
        // Degraded service reports the model error even for bad inputs.
        let model = ModelState::degraded();
        assert_eq!(
            predict_fee(&model, "", "", ""),
            Err(ApiError::ModelNotLoaded)
        );
    }
}
