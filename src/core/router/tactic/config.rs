//! Tactic kind + typed parameters, and the codec that parses both from a
//! typed record or from an untyped `kind` + parameter map (as arrives from
//! a surrounding JSON/YAML config layer).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::router::error::RouterError;

/// `(requests, tokens)` comparison threshold for RoundRobin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRobinParams {
    #[serde(default = "default_request_threshold")]
    pub request_threshold: i64,
}

impl Default for RoundRobinParams {
    fn default() -> Self {
        Self {
            request_threshold: default_request_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBasedParams {
    #[serde(default = "default_token_threshold")]
    pub token_threshold: i64,
}

impl Default for TokenBasedParams {
    fn default() -> Self {
        Self {
            token_threshold: default_token_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridParams {
    #[serde(default = "default_request_threshold")]
    pub request_threshold: i64,
    #[serde(default = "default_token_threshold")]
    pub token_threshold: i64,
}

impl Default for HybridParams {
    fn default() -> Self {
        Self {
            request_threshold: default_request_threshold(),
            token_threshold: default_token_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RandomParams;

/// Which latency statistic `LatencyBased` compares against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    #[default]
    Avg,
    P50,
    P95,
    P99,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyBasedParams {
    #[serde(default = "default_latency_threshold_ms")]
    pub latency_threshold_ms: i64,
    #[serde(default = "default_latency_sample_window")]
    pub sample_window_size: i64,
    #[serde(default = "default_percentile")]
    pub percentile: f64,
    #[serde(default)]
    pub comparison_mode: ComparisonMode,
}

impl Default for LatencyBasedParams {
    fn default() -> Self {
        Self {
            latency_threshold_ms: default_latency_threshold_ms(),
            sample_window_size: default_latency_sample_window(),
            percentile: default_percentile(),
            comparison_mode: ComparisonMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedBasedParams {
    #[serde(default = "default_min_samples_required")]
    pub min_samples_required: i64,
    #[serde(default = "default_speed_threshold_tps")]
    pub speed_threshold_tps: f64,
    #[serde(default = "default_speed_sample_window")]
    pub sample_window_size: i64,
}

impl Default for SpeedBasedParams {
    fn default() -> Self {
        Self {
            min_samples_required: default_min_samples_required(),
            speed_threshold_tps: default_speed_threshold_tps(),
            sample_window_size: default_speed_sample_window(),
        }
    }
}

/// How sub-scores combine into the composite in `Adaptive`. Only
/// `weighted_sum` and `multiplicative` are given distinct behavior here
/// (see the adaptive module); `rank_based` is accepted but intentionally
/// scores on per-candidate rank rather than raw magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    #[default]
    WeightedSum,
    Multiplicative,
    RankBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveParams {
    #[serde(default = "default_quarter_weight")]
    pub latency_weight: f64,
    #[serde(default = "default_quarter_weight")]
    pub token_weight: f64,
    #[serde(default = "default_quarter_weight")]
    pub speed_weight: f64,
    #[serde(default = "default_quarter_weight")]
    pub health_weight: f64,
    #[serde(default = "default_max_latency_ms")]
    pub max_latency_ms: f64,
    #[serde(default = "default_max_token_usage")]
    pub max_token_usage: f64,
    #[serde(default = "default_min_speed_tps")]
    pub min_speed_tps: f64,
    #[serde(default)]
    pub scoring_mode: ScoringMode,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self {
            latency_weight: default_quarter_weight(),
            token_weight: default_quarter_weight(),
            speed_weight: default_quarter_weight(),
            health_weight: default_quarter_weight(),
            max_latency_ms: default_max_latency_ms(),
            max_token_usage: default_max_token_usage(),
            min_speed_tps: default_min_speed_tps(),
            scoring_mode: ScoringMode::default(),
        }
    }
}

fn default_request_threshold() -> i64 {
    100
}
fn default_token_threshold() -> i64 {
    100_000
}
fn default_latency_threshold_ms() -> i64 {
    1000
}
fn default_latency_sample_window() -> i64 {
    100
}
fn default_percentile() -> f64 {
    0.95
}
fn default_min_samples_required() -> i64 {
    5
}
fn default_speed_threshold_tps() -> f64 {
    50.0
}
fn default_speed_sample_window() -> i64 {
    50
}
fn default_quarter_weight() -> f64 {
    0.25
}
fn default_max_latency_ms() -> f64 {
    1000.0
}
fn default_max_token_usage() -> f64 {
    100_000.0
}
fn default_min_speed_tps() -> f64 {
    50.0
}

/// The closed set of tactics, each carrying its typed parameter record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TacticConfig {
    RoundRobin(RoundRobinParams),
    TokenBased(TokenBasedParams),
    Hybrid(HybridParams),
    Random(RandomParams),
    LatencyBased(LatencyBasedParams),
    SpeedBased(SpeedBasedParams),
    Adaptive(AdaptiveParams),
}

impl TacticConfig {
    /// Wire-format kind string, lowercase snake_case, as emitted by the
    /// surrounding config layer.
    pub fn kind_str(&self) -> &'static str {
        match self {
            TacticConfig::RoundRobin(_) => "round_robin",
            TacticConfig::TokenBased(_) => "token_based",
            TacticConfig::Hybrid(_) => "hybrid",
            TacticConfig::Random(_) => "random",
            TacticConfig::LatencyBased(_) => "latency_based",
            TacticConfig::SpeedBased(_) => "speed_based",
            TacticConfig::Adaptive(_) => "adaptive",
        }
    }

    /// Parse a tactic from a kind name (case-insensitive) and an untyped
    /// parameter map (case-sensitive keys, coerced value types, missing or
    /// non-positive numerics replaced by documented defaults).
    ///
    /// Unknown keys in `params` are ignored. An unrecognized `kind` yields
    /// [`RouterError::UnknownTactic`]; callers are expected (per the error
    /// taxonomy) to substitute `RoundRobin` with defaults and warn.
    pub fn from_map(kind: &str, params: &Map<String, Value>) -> Result<Self, RouterError> {
        match kind.to_lowercase().as_str() {
            "round_robin" | "roundrobin" => Ok(TacticConfig::RoundRobin(RoundRobinParams {
                request_threshold: coerce_positive_i64(
                    params.get("requestThreshold"),
                    default_request_threshold(),
                ),
            })),
            "token_based" | "tokenbased" => Ok(TacticConfig::TokenBased(TokenBasedParams {
                token_threshold: coerce_positive_i64(
                    params.get("tokenThreshold"),
                    default_token_threshold(),
                ),
            })),
            "hybrid" => Ok(TacticConfig::Hybrid(HybridParams {
                request_threshold: coerce_positive_i64(
                    params.get("requestThreshold"),
                    default_request_threshold(),
                ),
                token_threshold: coerce_positive_i64(
                    params.get("tokenThreshold"),
                    default_token_threshold(),
                ),
            })),
            "random" => Ok(TacticConfig::Random(RandomParams)),
            "latency_based" | "latencybased" => {
                Ok(TacticConfig::LatencyBased(LatencyBasedParams {
                    latency_threshold_ms: coerce_positive_i64(
                        params.get("latencyThresholdMs"),
                        default_latency_threshold_ms(),
                    ),
                    sample_window_size: coerce_positive_i64(
                        params.get("sampleWindowSize"),
                        default_latency_sample_window(),
                    ),
                    percentile: coerce_positive_f64(params.get("percentile"), default_percentile()),
                    comparison_mode: parse_comparison_mode(params.get("comparisonMode")),
                }))
            }
            "speed_based" | "speedbased" => Ok(TacticConfig::SpeedBased(SpeedBasedParams {
                min_samples_required: coerce_positive_i64(
                    params.get("minSamplesRequired"),
                    default_min_samples_required(),
                ),
                speed_threshold_tps: coerce_positive_f64(
                    params.get("speedThresholdTps"),
                    default_speed_threshold_tps(),
                ),
                sample_window_size: coerce_positive_i64(
                    params.get("sampleWindowSize"),
                    default_speed_sample_window(),
                ),
            })),
            "adaptive" => Ok(TacticConfig::Adaptive(AdaptiveParams {
                latency_weight: coerce_f64(params.get("latencyWeight"), default_quarter_weight()),
                token_weight: coerce_f64(params.get("tokenWeight"), default_quarter_weight()),
                speed_weight: coerce_f64(params.get("speedWeight"), default_quarter_weight()),
                health_weight: coerce_f64(params.get("healthWeight"), default_quarter_weight()),
                max_latency_ms: coerce_positive_f64(
                    params.get("maxLatencyMs"),
                    default_max_latency_ms(),
                ),
                max_token_usage: coerce_positive_f64(
                    params.get("maxTokenUsage"),
                    default_max_token_usage(),
                ),
                min_speed_tps: coerce_positive_f64(
                    params.get("minSpeedTps"),
                    default_min_speed_tps(),
                ),
                scoring_mode: parse_scoring_mode(params.get("scoringMode")),
            })),
            other => Err(RouterError::UnknownTactic(other.to_string())),
        }
    }
}

fn parse_comparison_mode(value: Option<&Value>) -> ComparisonMode {
    match value.and_then(Value::as_str) {
        Some("p50") => ComparisonMode::P50,
        Some("p95") => ComparisonMode::P95,
        Some("p99") => ComparisonMode::P99,
        _ => ComparisonMode::Avg,
    }
}

fn parse_scoring_mode(value: Option<&Value>) -> ScoringMode {
    match value.and_then(Value::as_str) {
        Some("multiplicative") => ScoringMode::Multiplicative,
        Some("rank_based") => ScoringMode::RankBased,
        _ => ScoringMode::WeightedSum,
    }
}

/// Coerce a JSON value to i64, accepting integers, floats (truncated), and
/// string-parseable numerics. Missing or non-positive values fall back to
/// `default`, per the documented parameter-parsing rule.
fn coerce_positive_i64(value: Option<&Value>, default: i64) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    };
    match parsed {
        Some(v) if v > 0 => v,
        _ => default,
    }
}

fn coerce_positive_f64(value: Option<&Value>, default: f64) -> f64 {
    let parsed = coerce_f64_raw(value);
    match parsed {
        Some(v) if v > 0.0 => v,
        _ => default,
    }
}

/// Like [`coerce_positive_f64`] but accepts non-positive values too (used
/// for tactic weights, which may legitimately be 0).
fn coerce_f64(value: Option<&Value>, default: f64) -> f64 {
    coerce_f64_raw(value).unwrap_or(default)
}

fn coerce_f64_raw(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn missing_params_fall_back_to_defaults() {
        let parsed = TacticConfig::from_map("round_robin", &Map::new()).unwrap();
        assert_eq!(
            parsed,
            TacticConfig::RoundRobin(RoundRobinParams::default())
        );
    }

    #[test]
    fn non_positive_numeric_falls_back_to_default() {
        let params = as_map(json!({ "requestThreshold": -5 }));
        let parsed = TacticConfig::from_map("round_robin", &params).unwrap();
        assert_eq!(
            parsed,
            TacticConfig::RoundRobin(RoundRobinParams {
                request_threshold: default_request_threshold()
            })
        );
    }

    #[test]
    fn string_parseable_numeric_is_coerced() {
        let params = as_map(json!({ "tokenThreshold": "5000" }));
        let parsed = TacticConfig::from_map("token_based", &params).unwrap();
        assert_eq!(
            parsed,
            TacticConfig::TokenBased(TokenBasedParams {
                token_threshold: 5000
            })
        );
    }

    #[test]
    fn kind_is_case_insensitive() {
        let parsed = TacticConfig::from_map("RoundRobin", &Map::new()).unwrap();
        assert!(matches!(parsed, TacticConfig::RoundRobin(_)));
    }

    #[test]
    fn unknown_keys_in_params_are_ignored() {
        let params = as_map(json!({ "requestThreshold": 42, "bogus": "ignored" }));
        let parsed = TacticConfig::from_map("round_robin", &params).unwrap();
        assert_eq!(
            parsed,
            TacticConfig::RoundRobin(RoundRobinParams {
                request_threshold: 42
            })
        );
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let result = TacticConfig::from_map("quantum", &Map::new());
        assert!(matches!(result, Err(RouterError::UnknownTactic(_))));
    }

    #[test]
    fn typed_record_round_trips_through_serde() {
        let config = TacticConfig::LatencyBased(LatencyBasedParams {
            latency_threshold_ms: 2000,
            sample_window_size: 200,
            percentile: 0.99,
            comparison_mode: ComparisonMode::P99,
        });
        let encoded = serde_json::to_value(&config).unwrap();
        let decoded: TacticConfig = serde_json::from_value(encoded).unwrap();
        assert_eq!(config, decoded);
    }

    /// The §8 round-trip property: serializing a typed params record and
    /// parsing the result back through the untyped-map parser yields the
    /// original values, not the defaults. This requires the params structs'
    /// serialized field names to match the camelCase keys `from_map` reads.
    #[test]
    fn serialized_params_round_trip_through_map_parser() {
        let params = RoundRobinParams { request_threshold: 42 };
        let encoded = serde_json::to_value(params).unwrap();
        let map = encoded.as_object().unwrap().clone();
        let parsed = TacticConfig::from_map("round_robin", &map).unwrap();
        assert_eq!(parsed, TacticConfig::RoundRobin(params));
    }

    #[test]
    fn serialized_adaptive_params_round_trip_through_map_parser() {
        let params = AdaptiveParams {
            latency_weight: 0.4,
            token_weight: 0.3,
            speed_weight: 0.2,
            health_weight: 0.1,
            max_latency_ms: 2500.0,
            max_token_usage: 50_000.0,
            min_speed_tps: 75.0,
            scoring_mode: ScoringMode::Multiplicative,
        };
        let encoded = serde_json::to_value(params).unwrap();
        let map = encoded.as_object().unwrap().clone();
        let parsed = TacticConfig::from_map("adaptive", &map).unwrap();
        assert_eq!(parsed, TacticConfig::Adaptive(params));
    }
}
