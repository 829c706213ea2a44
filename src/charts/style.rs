//! Plot styles
//! Closed set of visual themes. A style is carried by each chart request,
//! never held as shared rendering state.

use plotters::prelude::*;
use plotters::style::TextStyle;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const FONT_FAMILY: &str = "sans-serif";

/// Visual theme applied to a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum PlotStyle {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "classic")]
    Classic,
    #[serde(rename = "ggplot")]
    Ggplot,
    #[serde(rename = "seaborn")]
    Seaborn,
    #[serde(rename = "bmh")]
    Bmh,
    #[serde(rename = "fivethirtyeight")]
    FiveThirtyEight,
    #[serde(rename = "grayscale")]
    Grayscale,
    #[serde(rename = "dark_background")]
    DarkBackground,
}

/// Concrete colours and sizes a style resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: RGBColor,
    pub panel: RGBColor,
    /// `None` hides the grid.
    pub grid: Option<RGBColor>,
    pub axis: RGBColor,
    pub text: RGBColor,
    pub primary: RGBColor,
    pub accent: RGBColor,
    pub caption_size: u32,
    pub label_size: u32,
}

impl Theme {
    pub fn caption_style(&self) -> TextStyle<'static> {
        (FONT_FAMILY, self.caption_size).into_font().color(&self.text)
    }

    pub fn label_style(&self) -> TextStyle<'static> {
        (FONT_FAMILY, self.label_size).into_font().color(&self.text)
    }

    pub fn annotation_style(&self, color: RGBColor) -> TextStyle<'static> {
        (FONT_FAMILY, self.label_size + 2).into_font().color(&color)
    }
}

impl PlotStyle {
    pub const ALL: [PlotStyle; 8] = [
        PlotStyle::Default,
        PlotStyle::Classic,
        PlotStyle::Ggplot,
        PlotStyle::Seaborn,
        PlotStyle::Bmh,
        PlotStyle::FiveThirtyEight,
        PlotStyle::Grayscale,
        PlotStyle::DarkBackground,
    ];

    /// Stable identifier used in the picker and the config file.
    pub fn name(self) -> &'static str {
        match self {
            PlotStyle::Default => "default",
            PlotStyle::Classic => "classic",
            PlotStyle::Ggplot => "ggplot",
            PlotStyle::Seaborn => "seaborn",
            PlotStyle::Bmh => "bmh",
            PlotStyle::FiveThirtyEight => "fivethirtyeight",
            PlotStyle::Grayscale => "grayscale",
            PlotStyle::DarkBackground => "dark_background",
        }
    }

    pub fn theme(self) -> Theme {
        let light = Theme {
            background: WHITE,
            panel: WHITE,
            grid: None,
            axis: BLACK,
            text: BLACK,
            primary: RGBColor(31, 119, 180),
            accent: RGBColor(255, 127, 14),
            caption_size: 20,
            label_size: 13,
        };

        match self {
            PlotStyle::Default => light,
            PlotStyle::Classic => Theme {
                primary: RGBColor(0, 0, 255),
                accent: RGBColor(0, 128, 0),
                ..light
            },
            PlotStyle::Ggplot => Theme {
                panel: RGBColor(229, 229, 229),
                grid: Some(WHITE),
                axis: RGBColor(85, 85, 85),
                text: RGBColor(85, 85, 85),
                primary: RGBColor(226, 74, 51),
                accent: RGBColor(52, 138, 189),
                ..light
            },
            PlotStyle::Seaborn => Theme {
                panel: RGBColor(234, 234, 242),
                grid: Some(WHITE),
                axis: RGBColor(38, 38, 38),
                text: RGBColor(38, 38, 38),
                primary: RGBColor(76, 114, 176),
                accent: RGBColor(221, 132, 82),
                ..light
            },
            PlotStyle::Bmh => Theme {
                panel: RGBColor(238, 238, 238),
                grid: Some(RGBColor(178, 178, 178)),
                axis: RGBColor(188, 188, 188),
                primary: RGBColor(52, 138, 189),
                accent: RGBColor(166, 6, 40),
                ..light
            },
            PlotStyle::FiveThirtyEight => Theme {
                background: RGBColor(240, 240, 240),
                panel: RGBColor(240, 240, 240),
                grid: Some(RGBColor(203, 203, 203)),
                axis: RGBColor(240, 240, 240),
                primary: RGBColor(0, 143, 213),
                accent: RGBColor(252, 79, 48),
                caption_size: 22,
                label_size: 14,
                ..light
            },
            PlotStyle::Grayscale => Theme {
                primary: RGBColor(0, 0, 0),
                accent: RGBColor(102, 102, 102),
                ..light
            },
            PlotStyle::DarkBackground => Theme {
                background: BLACK,
                panel: BLACK,
                axis: WHITE,
                text: WHITE,
                primary: RGBColor(141, 211, 199),
                accent: RGBColor(254, 255, 179),
                ..light
            },
        }
    }
}

impl fmt::Display for PlotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown plot style '{0}'")]
pub struct UnknownStyle(pub String);

impl FromStr for PlotStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}
