//! Small value types used across records.

/// Map layer a tile belongs to. Moving between layers needs a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Layer {
    #[default]
    Overworld,
    Underground,
    Interior,
}

impl Layer {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Underground => "underground",
            Self::Interior => "interior",
        }
    }

    /// Parses the code used by transition tiles to name their destination.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "overworld" => Some(Self::Overworld),
            "underground" => Some(Self::Underground),
            "interior" => Some(Self::Interior),
            _ => None,
        }
    }
}

/// Absolute location of a character or tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layer: Layer,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0,
        y: 0,
        layer: Layer::Overworld,
    };

    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            layer: Layer::Overworld,
        }
    }

    pub const fn on_layer(x: i32, y: i32, layer: Layer) -> Self {
        Self { x, y, layer }
    }

    /// Manhattan distance ignoring layers.
    pub fn distance(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}) {:?}", self.x, self.y, self.layer)
    }
}

/// An item code paired with a quantity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub code: String,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }
}
