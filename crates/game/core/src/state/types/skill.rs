use strum::EnumIter;

/// Character skills. `Combat` is the character level itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Skill {
    Combat,
    Mining,
    Woodcutting,
    Fishing,
    Alchemy,
    Weaponcrafting,
    Gearcrafting,
    Jewelrycrafting,
    Cooking,
}

impl Skill {
    pub const fn is_gathering(&self) -> bool {
        matches!(
            self,
            Self::Mining | Self::Woodcutting | Self::Fishing | Self::Alchemy
        )
    }

    pub const fn is_crafting(&self) -> bool {
        matches!(
            self,
            Self::Weaponcrafting
                | Self::Gearcrafting
                | Self::Jewelrycrafting
                | Self::Cooking
                | Self::Mining
                | Self::Woodcutting
                | Self::Alchemy
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Combat => "combat",
            Self::Mining => "mining",
            Self::Woodcutting => "woodcutting",
            Self::Fishing => "fishing",
            Self::Alchemy => "alchemy",
            Self::Weaponcrafting => "weaponcrafting",
            Self::Gearcrafting => "gearcrafting",
            Self::Jewelrycrafting => "jewelrycrafting",
            Self::Cooking => "cooking",
        }
    }
}

impl core::fmt::Display for Skill {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
