//! URL-embeddable chart state.
//!
//! Uses the LZ-String "encoded URI component" format, so strings produced by
//! web hosts with `compressToEncodedURIComponent` decode here and vice versa.

use tracing::debug;

use crate::core::ChartConfiguration;
use crate::error::{ChartError, ChartResult};

/// Characters that can appear in a compressed string.
const URI_SAFE_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";

/// Compresses `text` into a URL-safe string.
#[must_use]
pub fn compress(text: &str) -> String {
    lz_str::compress_to_encoded_uri_component(text)
}

/// Reverses `compress`. Malformed input yields `None`.
#[must_use]
pub fn decompress(compressed: &str) -> Option<String> {
    if let Some(invalid) = compressed
        .chars()
        .find(|c| *c != ' ' && !URI_SAFE_ALPHABET.contains(*c))
    {
        debug!(%invalid, "rejecting compressed state with non URI-safe character");
        return None;
    }

    let units = lz_str::decompress_from_encoded_uri_component(compressed)?;
    match String::from_utf16(&units) {
        Ok(text) => Some(text),
        Err(err) => {
            debug!(error = %err, "decompressed state is not valid UTF-16");
            None
        }
    }
}

/// Serializes the configuration to JSON and compresses it.
pub fn encode_configuration(config: &ChartConfiguration) -> ChartResult<String> {
    let json = serde_json::to_string(config).map_err(|e| {
        ChartError::InvalidData(format!("failed to serialize chart configuration: {e}"))
    })?;
    Ok(compress(&json))
}

/// Reverses `encode_configuration`. Any failure yields `None`.
#[must_use]
pub fn decode_configuration(compressed: &str) -> Option<ChartConfiguration> {
    let json = decompress(compressed)?;
    match serde_json::from_str(&json) {
        Ok(config) => Some(config),
        Err(err) => {
            debug!(error = %err, "compressed state is not a chart configuration");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{compress, decode_configuration, decompress, encode_configuration};
    use crate::core::{BarDatum, ChartConfiguration, ExerciseSet, MetricCategory};

    #[test]
    fn compressed_text_is_uri_safe() {
        let compressed = compress("Squat / Bench & Deadlift? 100% effort = gains");
        assert!(
            compressed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '$'))
        );
        assert_eq!(
            decompress(&compressed).as_deref(),
            Some("Squat / Bench & Deadlift? 100% effort = gains")
        );
    }

    #[test]
    fn malformed_input_is_none() {
        assert!(decompress("%%% not compressed %%%").is_none());
        assert!(decompress("{\"json\": true}").is_none());
        assert!(decode_configuration("%%%").is_none());
    }

    #[test]
    fn configuration_survives_encoding() {
        let config = ChartConfiguration::default()
            .with_group(
                "Legs",
                vec![
                    BarDatum::new("Quads").with_count(MetricCategory::TargetCompound, 9.5),
                    BarDatum::new("Hamstrings").with_count(MetricCategory::Synergists, 4.0),
                ],
            )
            .with_exercises(
                "Quads",
                ExerciseSet::default().with_exercises(MetricCategory::TargetCompound, ["Squat"]),
            );
        let encoded = encode_configuration(&config).expect("encode");
        assert_eq!(decode_configuration(&encoded), Some(config));
    }

    #[test]
    fn valid_text_that_is_not_a_configuration_is_none() {
        assert!(decode_configuration(&compress("[1, 2, 3]")).is_none());
    }
}
