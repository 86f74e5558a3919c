use crate::complex::Complex;
use crate::error::CoreError;

/// Iteration budget and bailout radius for the escape-time loop.
///
/// `escape_radius²` and `ln(escape_radius)` are cached because the loop
/// and the smoothing step read them once per pixel. They are recomputed on
/// deserialization so preferences never carry stale values.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct EscapeParams {
    /// Maximum number of `z ← z² + c` steps before a point counts as interior.
    pub iteration_budget: u32,

    /// Bailout radius; the orbit has escaped once `|z| >= escape_radius`.
    pub escape_radius: f64,

    #[serde(skip)]
    escape_radius_sq: f64,

    #[serde(skip)]
    ln_escape_radius: f64,
}

impl<'de> serde::Deserialize<'de> for EscapeParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            iteration_budget: u32,
            escape_radius: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.iteration_budget, raw.escape_radius).map_err(serde::de::Error::custom)
    }
}

impl EscapeParams {
    pub const DEFAULT_ITERATION_BUDGET: u32 = 100;
    pub const DEFAULT_ESCAPE_RADIUS: f64 = 100.0;

    /// A zero budget is accepted (every point evaluates as interior); the
    /// radius must be positive and finite.
    pub fn new(iteration_budget: u32, escape_radius: f64) -> crate::Result<Self> {
        if escape_radius <= 0.0 || !escape_radius.is_finite() {
            return Err(CoreError::InvalidEscapeRadius(escape_radius));
        }
        Ok(Self {
            iteration_budget,
            escape_radius,
            escape_radius_sq: escape_radius * escape_radius,
            ln_escape_radius: escape_radius.ln(),
        })
    }

    #[inline]
    pub fn escape_radius_sq(&self) -> f64 {
        self.escape_radius_sq
    }

    /// Return a copy with a different iteration budget.
    pub fn with_iteration_budget(self, iteration_budget: u32) -> Self {
        Self {
            iteration_budget,
            ..self
        }
    }
}

impl Default for EscapeParams {
    fn default() -> Self {
        Self {
            iteration_budget: Self::DEFAULT_ITERATION_BUDGET,
            escape_radius: Self::DEFAULT_ESCAPE_RADIUS,
            escape_radius_sq: Self::DEFAULT_ESCAPE_RADIUS * Self::DEFAULT_ESCAPE_RADIUS,
            ln_escape_radius: Self::DEFAULT_ESCAPE_RADIUS.ln(),
        }
    }
}

/// Orbits of points in the set never leave this disc, so the closed-form
/// interior tests are only exact for radii at least this large.
const SET_BOUND_RADIUS: f64 = 2.0;

/// Returns `true` if `c` lies inside the main cardioid.
#[inline]
fn in_cardioid(re: f64, im: f64) -> bool {
    let im2 = im * im;
    let q = (re - 0.25) * (re - 0.25) + im2;
    q * (q + (re - 0.25)) <= 0.25 * im2
}

/// Returns `true` if `c` lies inside the period-2 bulb.
#[inline]
fn in_period2_bulb(re: f64, im: f64) -> bool {
    (re + 1.0) * (re + 1.0) + im * im <= 0.0625
}

/// Escape-time evaluation of `z ← z² + c` from `z₀ = 0`.
///
/// [`evaluate`](Self::evaluate) returns a normalized, smoothed escape value
/// in `0.0..=1.0`. Exactly `0.0` means the orbit stayed bounded for the
/// whole budget; escaped points are clamped to at least
/// `f32::MIN_POSITIVE` so they never collide with that sentinel.
///
/// Smoothing uses the continuous iteration count
///
/// ```text
/// ν = n − log₂( ln(|z|²) / 2 / ln(R) )
/// ```
///
/// where `n` counts applications of the map (the first step is `n = 1`),
/// `|z|²` is taken at the escaping step and `R` is the escape radius. The
/// result is `ν / budget`. When the radius is too small for the logarithms
/// to be defined (`R <= 1`) the raw `n / budget` is used instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeEvaluator {
    params: EscapeParams,
}

impl EscapeEvaluator {
    pub fn new(params: EscapeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EscapeParams {
        &self.params
    }

    pub fn evaluate(&self, c: Complex) -> f32 {
        let budget = self.params.iteration_budget;
        if budget == 0 {
            return 0.0;
        }
        // These regions never escape, whatever the budget, unless the
        // radius is small enough for bounded orbits to cross it.
        if self.params.escape_radius >= SET_BOUND_RADIUS
            && (in_cardioid(c.re, c.im) || in_period2_bulb(c.re, c.im))
        {
            return 0.0;
        }

        let escape_radius_sq = self.params.escape_radius_sq();
        let mut z = Complex::ZERO;
        for n in 1..=budget {
            z = z.square_add(c);
            let norm_sq = z.norm_sq();
            if norm_sq >= escape_radius_sq {
                return self.smooth(n, norm_sq);
            }
        }
        0.0
    }

    #[inline]
    fn smooth(&self, n: u32, norm_sq: f64) -> f32 {
        let budget = self.params.iteration_budget as f64;
        let correction = (norm_sq.ln() / 2.0 / self.params.ln_escape_radius).log2();
        let nu = if self.params.ln_escape_radius > 0.0 && correction.is_finite() {
            n as f64 - correction
        } else {
            n as f64
        };
        ((nu / budget) as f32).clamp(f32::MIN_POSITIVE, 1.0)
    }
}
