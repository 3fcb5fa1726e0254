//! Single-valued category axes.
//!
//! Each parcel carries exactly one value per axis. The `parse` functions
//! accept the snake_case labels used on the wire and in the snapshot;
//! unknown labels are rejected by the normalizer, never guessed.

use serde::{Deserialize, Serialize};

macro_rules! category_axis {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Wire/storage label of this value.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parse a wire/storage label. Returns `None` for unknown values.
            pub fn parse(label: &str) -> Option<Self> {
                match label {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// All values of this axis, in a fixed order.
            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }
        }
    };
}

category_axis! {
    /// Who holds title to the parcel.
    OwnershipType {
        Private => "private",
        Municipal => "municipal",
        StateTreasury => "state_treasury",
        Cooperative => "cooperative",
    }
}

category_axis! {
    /// Development state of the parcel.
    BuildStatus {
        Vacant => "vacant",
        UnderConstruction => "under_construction",
        Developed => "developed",
    }
}

category_axis! {
    /// Coarse size bucket assigned at snapshot build time.
    SizeClass {
        Small => "small",
        Medium => "medium",
        Large => "large",
        VeryLarge => "very_large",
    }
}
