//! Metric synthesis from profile parameters and the seeded stream.

use spectral_common::VerificationMetrics;

use super::profiles::VerificationProfile;
use super::rng::SeededRng;

/// Round to a fixed number of decimals the way persisted values were always
/// produced: nearest decimal, with exact ties going to the larger magnitude.
///
/// Decimal formatting already picks the nearest value, but breaks exact ties
/// to even. A tie at `decimals` places means `value * 2^(decimals + 1)` is an
/// odd integer, in which case `value * 10^decimals` is exactly `k + 0.5`.
fn round_to(value: f64, decimals: usize) -> f64 {
    let exp = decimals as i32;
    let halves = value * 2f64.powi(exp + 1);
    if halves.fract() == 0.0 && halves.abs() % 2.0 == 1.0 {
        let scale = 10f64.powi(exp);
        return (value.abs() * scale).ceil().copysign(value) / scale;
    }
    format!("{:.*}", decimals, value)
        .parse::<f64>()
        .unwrap_or(value)
}

fn jitter(baseline: f64, spread: f64, rng: &mut SeededRng) -> f64 {
    baseline + (rng.next_f64() - 0.5) * spread
}

/// Produce the five metrics for a profile.
///
/// Draws exactly one value per field in the order leakage, hallucination,
/// bias, resilience, reliability. Downstream draws (risk ids) depend on it.
pub fn synthesize(profile: &VerificationProfile, rng: &mut SeededRng) -> VerificationMetrics {
    let base = &profile.metric_baselines;
    let spread = &profile.metric_spread;

    let phi = jitter(base.phi_leakage_rate, spread.phi_leakage_rate, rng);
    let hallucination = jitter(base.hallucination_rate, spread.hallucination_rate, rng);
    let bias = jitter(base.bias_parity_gap, spread.bias_parity_gap, rng);
    let resilience = jitter(
        base.prompt_injection_resilience,
        spread.prompt_injection_resilience,
        rng,
    );
    let reliability = jitter(base.reliability_score, spread.reliability_score, rng);

    VerificationMetrics {
        phi_leakage_rate: round_to(phi.clamp(0.0, 1.0), 3),
        hallucination_rate: round_to(hallucination.clamp(0.0, 10.0), 2),
        bias_parity_gap: round_to(bias.clamp(0.0, 0.25), 3),
        prompt_injection_resilience: resilience.clamp(50.0, 99.0).round(),
        reliability_score: reliability.clamp(70.0, 99.0).round(),
    }
}
