//! Tagged results that keep real and synthetic data apart.
//!
//! External calls (Astria, OpenAI) fall back to placeholder data when they
//! fail so the user flow keeps moving. [`Sourced`] records which of the two
//! happened; it is carried through to response bodies and persisted rows
//! instead of being flattened into an indistinguishable success.

/// A value obtained either from the external service or synthesized locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sourced<T> {
    /// Returned by the external service.
    Real(T),
    /// Fabricated locally after the external call failed or was skipped.
    Simulated(T),
}

impl<T> Sourced<T> {
    pub fn is_simulated(&self) -> bool {
        matches!(self, Sourced::Simulated(_))
    }

    /// Drop the tag and return the payload.
    pub fn into_inner(self) -> T {
        match self {
            Sourced::Real(v) | Sourced::Simulated(v) => v,
        }
    }

    pub fn as_ref(&self) -> Sourced<&T> {
        match self {
            Sourced::Real(v) => Sourced::Real(v),
            Sourced::Simulated(v) => Sourced::Simulated(v),
        }
    }

    /// Transform the payload while keeping the tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        match self {
            Sourced::Real(v) => Sourced::Real(f(v)),
            Sourced::Simulated(v) => Sourced::Simulated(f(v)),
        }
    }

    /// `"real"` or `"simulated"`, for logs and response bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Sourced::Real(_) => "real",
            Sourced::Simulated(_) => "simulated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_keeps_tag() {
        let s = Sourced::Simulated(2).map(|v| v * 10);
        assert_eq!(s, Sourced::Simulated(20));
        assert!(s.is_simulated());

        let r = Sourced::Real("a").map(str::len);
        assert_eq!(r, Sourced::Real(1));
        assert!(!r.is_simulated());
    }

    #[test]
    fn label_and_into_inner() {
        assert_eq!(Sourced::Real(()).label(), "real");
        assert_eq!(Sourced::Simulated(()).label(), "simulated");
        assert_eq!(Sourced::Simulated(7).into_inner(), 7);
    }
}
