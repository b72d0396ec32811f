//! Scenario fan-out: derive parameter sweeps from a template configuration.

use crate::flow::RandomInfo;
use crate::types::error::{SimError, SimResult};
use crate::types::Parameter;

use super::path::PathInfo;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One complete simulation configuration: the path template and the driver
/// template.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimConfig {
    /// Path configuration.
    pub path_info: PathInfo,
    /// Driver configuration.
    pub random_info: RandomInfo,
}

/// Clones `template` once per entry of `values`, overriding the swept
/// `parameter` with that entry.
///
/// Integer-valued parameters truncate their value; the seed is taken as an
/// unsigned integer.
///
/// # Errors
///
/// [`SimError::InvalidArgument`] for the reserved parameters
/// [`Parameter::IniLobVolume`] and [`Parameter::IniLobDecay`].
///
/// # Example
///
/// ```rust
/// use microhedger::book::Book;
/// use microhedger::flow::RandomInfo;
/// use microhedger::sim::{generate_scenarios, PathInfo, SimConfig};
/// use microhedger::types::Parameter;
///
/// let template = SimConfig {
///     path_info: PathInfo {
///         n_days: 5,
///         n_hours: 5,
///         n_quarters: 4,
///         initial_fundamental: 5.0,
///         initial_book: Book::new(),
///         hedger_option_position: 80.0,
///         hedger_implied_volatility: 0.089,
///     },
///     random_info: RandomInfo {
///         seed: 9999,
///         vol_news: 0.0,
///         order_intensity: 1.0,
///         prob_limit: 0.1,
///         prob_informed: 0.3,
///         vol_min: 0.0,
///         vol_max: 1.0,
///         mean_spread: -0.1,
///         vol_spread: 0.1,
///         prob_sign: 0.5,
///     },
/// };
/// let sweep =
///     generate_scenarios(&template, Parameter::OrderIntensity, &[0.5, 1.0, 2.0]).unwrap();
/// assert_eq!(sweep.len(), 3);
/// assert_eq!(sweep[2].random_info.order_intensity, 2.0);
/// ```
pub fn generate_scenarios(
    template: &SimConfig,
    parameter: Parameter,
    values: &[f64],
) -> SimResult<Vec<SimConfig>> {
    values
        .iter()
        .map(|&value| {
            let mut config = template.clone();
            match parameter {
                Parameter::NDays => config.path_info.n_days = value as usize,
                Parameter::NHours => config.path_info.n_hours = value as usize,
                Parameter::NQuarters => config.path_info.n_quarters = value as usize,
                Parameter::IniFundamental => config.path_info.initial_fundamental = value,
                Parameter::HedgerOptionPosition => {
                    config.path_info.hedger_option_position = value;
                }
                Parameter::HedgerImpliedVolatility => {
                    config.path_info.hedger_implied_volatility = value;
                }
                Parameter::RandomSeed => config.random_info.seed = value as u64,
                Parameter::VolatilityFundamental => config.random_info.vol_news = value,
                Parameter::OrderIntensity => config.random_info.order_intensity = value,
                Parameter::ProbLimitOrder => config.random_info.prob_limit = value,
                Parameter::ProbInformed => config.random_info.prob_informed = value,
                Parameter::ProbBuy => config.random_info.prob_sign = value,
                Parameter::VolumeMin => config.random_info.vol_min = value,
                Parameter::VolumeMax => config.random_info.vol_max = value,
                Parameter::SpreadMean => config.random_info.mean_spread = value,
                Parameter::SpreadVolatility => config.random_info.vol_spread = value,
                Parameter::IniLobVolume | Parameter::IniLobDecay => {
                    return Err(SimError::InvalidArgument(format!(
                        "parameter {parameter:?} is reserved and not implemented"
                    )));
                }
            }
            Ok(config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Book;

    fn template() -> SimConfig {
        SimConfig {
            path_info: PathInfo {
                n_days: 5,
                n_hours: 5,
                n_quarters: 4,
                initial_fundamental: 5.0,
                initial_book: Book::new(),
                hedger_option_position: 80.0,
                hedger_implied_volatility: 0.089,
            },
            random_info: RandomInfo {
                seed: 9999,
                vol_news: 0.0,
                order_intensity: 1.0,
                prob_limit: 0.1,
                prob_informed: 0.3,
                vol_min: 0.0,
                vol_max: 1.0,
                mean_spread: -0.1,
                vol_spread: 0.1,
                prob_sign: 0.5,
            },
        }
    }

    #[test]
    fn test_one_scenario_per_value() {
        let sweep =
            generate_scenarios(&template(), Parameter::VolatilityFundamental, &[0.0, 0.1, 0.2])
                .unwrap();
        assert_eq!(sweep.len(), 3);
        assert_eq!(sweep[0].random_info.vol_news, 0.0);
        assert_eq!(sweep[1].random_info.vol_news, 0.1);
        assert_eq!(sweep[2].random_info.vol_news, 0.2);
        // everything else stays at the template value
        assert_eq!(sweep[2].random_info.seed, 9999);
        assert_eq!(sweep[2].path_info.n_days, 5);
    }

    #[test]
    fn test_integer_parameters_truncate() {
        let sweep = generate_scenarios(&template(), Parameter::NDays, &[3.0, 10.9]).unwrap();
        assert_eq!(sweep[0].path_info.n_days, 3);
        assert_eq!(sweep[1].path_info.n_days, 10);

        let sweep = generate_scenarios(&template(), Parameter::RandomSeed, &[123.0]).unwrap();
        assert_eq!(sweep[0].random_info.seed, 123);
    }

    #[test]
    fn test_every_supported_parameter_lands_in_a_field() {
        let cases = [
            (Parameter::NHours, 7.0),
            (Parameter::NQuarters, 8.0),
            (Parameter::IniFundamental, 6.5),
            (Parameter::HedgerOptionPosition, 40.0),
            (Parameter::HedgerImpliedVolatility, 0.2),
            (Parameter::OrderIntensity, 3.0),
            (Parameter::ProbLimitOrder, 0.4),
            (Parameter::ProbInformed, 0.6),
            (Parameter::ProbBuy, 0.7),
            (Parameter::VolumeMin, 1.0),
            (Parameter::VolumeMax, 9.0),
            (Parameter::SpreadMean, 0.3),
            (Parameter::SpreadVolatility, 0.05),
        ];
        for (parameter, value) in cases {
            let sweep = generate_scenarios(&template(), parameter, &[value]).unwrap();
            assert_eq!(sweep.len(), 1);
            assert_ne!(sweep[0], template(), "parameter {parameter:?} had no effect");
        }
    }

    #[test]
    fn test_reserved_parameters_are_rejected() {
        for parameter in [Parameter::IniLobVolume, Parameter::IniLobDecay] {
            let err = generate_scenarios(&template(), parameter, &[1.0]).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_empty_sweep_is_empty() {
        let sweep = generate_scenarios(&template(), Parameter::NDays, &[]).unwrap();
        assert!(sweep.is_empty());
    }
}
