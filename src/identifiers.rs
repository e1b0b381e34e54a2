// -------------------------------------------------------------------------------------------------
//  Strongly-typed identifiers used throughout the order emulation domain.
// -------------------------------------------------------------------------------------------------

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};
use ustr::Ustr;

macro_rules! identifier {
    ($name:ident) => {
        #[repr(C)]
        #[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ustr);

        impl $name {
            /// Creates a new identifier from anything string-like.
            #[must_use]
            pub fn new<T: AsRef<str>>(value: T) -> Self {
                Self(Ustr::from(value.as_ref()))
            }

            /// Returns the identifier value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(TraderId);
identifier!(ClientId);
identifier!(StrategyId);
identifier!(InstrumentId);
identifier!(ClientOrderId);
identifier!(VenueOrderId);
identifier!(PositionId);
identifier!(ExecAlgorithmId);
identifier!(ExecSpawnId);

impl InstrumentId {
    /// Synthetic instruments are conventionally suffixed `.SYNTH` in this domain, matching
    /// the `venue == "SYNTH"` convention used upstream to mark composite instruments.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.as_str().ends_with(".SYNTH")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_instrument_detected_by_suffix() {
        assert!(InstrumentId::from("BASKET-1.SYNTH").is_synthetic());
        assert!(!InstrumentId::from("AAPL.XNAS").is_synthetic());
    }

    #[test]
    fn identifiers_round_trip_display() {
        let cid = ClientOrderId::from("O-1");
        assert_eq!(cid.as_str(), "O-1");
        assert_eq!(format!("{cid}"), "O-1");
    }
}
