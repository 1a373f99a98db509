//! Configuration validation and construction of the risk chain and policy.
//!
//! Values are checked here so the core can assume well-formed parameters.

use std::collections::HashSet;
use std::str::FromStr;

use crate::domain::error::RecommendError;
use crate::domain::risk_chain::RiskChain;
use crate::domain::risk_rule::{
    RiskRule, DEFAULT_MAX_PRICE, DEFAULT_MAX_TURNOVER, DEFAULT_MAX_VOLATILITY, DEFAULT_MIN_PRICE,
    DEFAULT_MIN_TURNOVER, DEFAULT_SPECIAL_MARKER, DEFAULT_VOLATILITY_LOOKBACK_DAYS,
};
use crate::domain::security::{FINAL_SCORE_COLUMN, SECTOR_COLUMN};
use crate::domain::selection::{
    SelectionPolicy, DEFAULT_MAX_COUNT, DEFAULT_SECTOR_LIMIT, DEFAULT_THRESHOLD, DEFAULT_TOP_N,
};
use crate::ports::config_port::ConfigPort;

const RISK: &str = "risk";
const SELECTION: &str = "selection";

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> RecommendError {
    RecommendError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn missing(section: &str, key: &str) -> RecommendError {
    RecommendError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

/// Absent key gives `default`; a key with an empty value is missing; a value
/// that does not parse is invalid.
fn parse_value<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, RecommendError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Err(missing(section, key)),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| invalid(section, key, format!("'{}' is not a valid number", raw.trim()))),
    }
}

/// Builds the risk chain from `[risk] rules`, in listed order. An absent key
/// gives an empty chain.
pub fn build_risk_chain(config: &dyn ConfigPort) -> Result<RiskChain, RecommendError> {
    let names = config.get_list(RISK, "rules").unwrap_or_default();
    let mut seen = HashSet::new();
    let mut chain = RiskChain::new();

    for name in names {
        if !seen.insert(name.clone()) {
            return Err(invalid(RISK, "rules", format!("duplicate rule '{name}'")));
        }
        chain.push(build_rule(config, &name)?);
    }
    Ok(chain)
}

fn build_rule(config: &dyn ConfigPort, name: &str) -> Result<RiskRule, RecommendError> {
    match name {
        "price" => {
            let min_price = non_negative(config, "min_price", DEFAULT_MIN_PRICE)?;
            let max_price = non_negative(config, "max_price", DEFAULT_MAX_PRICE)?;
            ordered_band("max_price", min_price, max_price)?;
            Ok(RiskRule::PriceBand {
                min_price,
                max_price,
            })
        }
        "turnover" => {
            let min_turnover = non_negative(config, "min_turnover", DEFAULT_MIN_TURNOVER)?;
            let max_turnover = non_negative(config, "max_turnover", DEFAULT_MAX_TURNOVER)?;
            ordered_band("max_turnover", min_turnover, max_turnover)?;
            Ok(RiskRule::TurnoverBand {
                min_turnover,
                max_turnover,
            })
        }
        "volatility" => {
            let max_volatility = non_negative(config, "max_volatility", DEFAULT_MAX_VOLATILITY)?;
            let lookback_days = positive_count(
                config,
                RISK,
                "volatility_lookback_days",
                DEFAULT_VOLATILITY_LOOKBACK_DAYS,
            )?;
            Ok(RiskRule::VolatilityCeiling {
                max_volatility,
                lookback_days,
            })
        }
        "special_designation" => {
            let markers = config
                .get_list(RISK, "special_markers")
                .unwrap_or_else(|| vec![DEFAULT_SPECIAL_MARKER.to_string()]);
            if markers.is_empty() {
                return Err(missing(RISK, "special_markers"));
            }
            Ok(RiskRule::SpecialDesignation { markers })
        }
        other => Err(invalid(RISK, "rules", format!("unknown rule '{other}'"))),
    }
}

fn non_negative(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, RecommendError> {
    let value: f64 = parse_value(config, RISK, key, default)?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(RISK, key, format!("{key} must be non-negative")));
    }
    Ok(value)
}

fn ordered_band(upper_key: &str, lower: f64, upper: f64) -> Result<(), RecommendError> {
    if lower > upper {
        return Err(invalid(
            RISK,
            upper_key,
            format!("{upper_key} must not be below its lower bound ({lower})"),
        ));
    }
    Ok(())
}

fn positive_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, RecommendError> {
    let value: i64 = parse_value(config, section, key, default as i64)?;
    if value < 1 {
        return Err(invalid(section, key, format!("{key} must be at least 1")));
    }
    Ok(value as usize)
}

fn column_name(config: &dyn ConfigPort, key: &str, default: &str) -> Result<String, RecommendError> {
    match config.get_string(SELECTION, key) {
        None => Ok(default.to_string()),
        Some(s) if s.trim().is_empty() => Err(missing(SELECTION, key)),
        Some(s) => Ok(s.trim().to_string()),
    }
}

/// Builds the selection policy from `[selection]`. An absent `policy` key
/// selects `top_n`.
pub fn build_selection_policy(config: &dyn ConfigPort) -> Result<SelectionPolicy, RecommendError> {
    let policy = match config.get_string(SELECTION, "policy") {
        None => "top_n".to_string(),
        Some(p) if p.trim().is_empty() => return Err(missing(SELECTION, "policy")),
        Some(p) => p.trim().to_string(),
    };
    let score_column = column_name(config, "score_column", FINAL_SCORE_COLUMN)?;

    match policy.as_str() {
        "top_n" => Ok(SelectionPolicy::TopN {
            n: positive_count(config, SELECTION, "n", DEFAULT_TOP_N)?,
            score_column,
        }),
        "threshold" => {
            let threshold: f64 = parse_value(config, SELECTION, "threshold", DEFAULT_THRESHOLD)?;
            if !threshold.is_finite() {
                return Err(invalid(SELECTION, "threshold", "threshold must be finite"));
            }
            Ok(SelectionPolicy::Threshold {
                threshold,
                score_column,
                max_count: positive_count(config, SELECTION, "max_count", DEFAULT_MAX_COUNT)?,
            })
        }
        "sector_balanced" => Ok(SelectionPolicy::SectorBalanced {
            top_n: positive_count(config, SELECTION, "top_n", DEFAULT_TOP_N)?,
            sector_limit: positive_count(config, SELECTION, "sector_limit", DEFAULT_SECTOR_LIMIT)?,
            score_column,
            sector_column: column_name(config, "sector_column", SECTOR_COLUMN)?,
        }),
        other => Err(invalid(
            SELECTION,
            "policy",
            format!("unknown policy '{other}', expected top_n, threshold or sector_balanced"),
        )),
    }
}

/// Validates both sections without keeping the result.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), RecommendError> {
    build_risk_chain(config)?;
    build_selection_policy(config)?;
    Ok(())
}
