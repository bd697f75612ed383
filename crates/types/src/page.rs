//! Page sizes, orientation and margins.
use crate::geometry::Size;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Parse a length with optional unit (e.g., "10pt", "5mm", "1in", "12")
    fn parse_length(input: &str) -> Result<f32, String> {
        let input = input.trim();
        let parse = |val: &str, factor: f32| {
            val.trim()
                .parse::<f32>()
                .map(|v| v * factor)
                .map_err(|e| format!("Invalid number: {}", e))
        };

        if let Some(val) = input.strip_suffix("pt") {
            return parse(val, 1.0);
        }
        if let Some(val) = input.strip_suffix("in") {
            return parse(val, 72.0);
        }
        if let Some(val) = input.strip_suffix("cm") {
            return parse(val, 28.35);
        }
        if let Some(val) = input.strip_suffix("mm") {
            return parse(val, 2.835);
        }
        parse(input, 1.0)
    }

    /// Parse CSS-style margin shorthand (1, 2, or 4 values)
    fn parse_shorthand(input: &str) -> Result<Self, String> {
        let values = input
            .split_whitespace()
            .map(Self::parse_length)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [vertical, horizontal] => Ok(Margins {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Margins {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(format!(
                "Invalid margin shorthand: expected 1, 2, or 4 values, got {}",
                values.len()
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarginsVisitor;
        impl<'de> de::Visitor<'de> for MarginsVisitor {
            type Value = Margins;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number, a string like '10pt' or '10pt 20pt', or a map")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Margins, E> {
                Ok(Margins::all(value as f32))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Margins, E> {
                Ok(Margins::all(value as f32))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Margins, E> {
                Ok(Margins::all(value as f32))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Margins, E> {
                Margins::parse_shorthand(value).map_err(E::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Margins, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut margins = Margins::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => margins.top = map.next_value()?,
                        "right" => margins.right = map.next_value()?,
                        "bottom" => margins.bottom = map.next_value()?,
                        "left" => margins.left = map.next_value()?,
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(margins)
            }
        }
        deserializer.deserialize_any(MarginsVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "" | "p" | "portrait" => Ok(Orientation::Portrait),
            "l" | "landscape" => Ok(Orientation::Landscape),
            other => Err(format!("Unknown orientation: {}", other)),
        }
    }

    /// Applies this orientation to a size given in portrait form.
    pub fn apply(self, size: Size) -> Size {
        let (short, long) = if size.width <= size.height {
            (size.width, size.height)
        } else {
            (size.height, size.width)
        };
        match self {
            Orientation::Portrait => Size::new(short, long),
            Orientation::Landscape => Size::new(long, short),
        }
    }
}

impl Serialize for Orientation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        })
    }
}

impl<'de> Deserialize<'de> for Orientation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    A1,
    A2,
    A3,
    #[default]
    A4,
    A5,
    A6,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f32,
        height: f32,
    },
}

impl PageSize {
    /// Portrait dimensions in points.
    pub fn dimensions_pt(&self) -> Size {
        let (w, h) = match self {
            PageSize::A1 => (1683.78, 2383.94),
            PageSize::A2 => (1190.55, 1683.78),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (420.94, 595.28),
            PageSize::A6 => (297.64, 420.94),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        };
        Size::new(w, h)
    }

    /// Dimensions after applying `orientation`. Custom sizes are taken as given.
    pub fn oriented(&self, orientation: Orientation) -> Size {
        match self {
            PageSize::Custom { .. } => self.dimensions_pt(),
            _ => orientation.apply(self.dimensions_pt()),
        }
    }

    /// Parse a page size name (e.g., "A4", "Letter", "Legal")
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "a1" => Ok(PageSize::A1),
            "a2" => Ok(PageSize::A2),
            "a3" => Ok(PageSize::A3),
            "" | "a4" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            "a6" => Ok(PageSize::A6),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            "tabloid" => Ok(PageSize::Tabloid),
            _ => Err(format!("Unknown page size: {}", s)),
        }
    }

    fn name(&self) -> Option<&'static str> {
        Some(match self {
            PageSize::A1 => "A1",
            PageSize::A2 => "A2",
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::A6 => "A6",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
            PageSize::Tabloid => "Tabloid",
            PageSize::Custom { .. } => return None,
        })
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(name) = self.name() {
            return serializer.serialize_str(name);
        }
        let size = self.dimensions_pt();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("width", &size.width)?;
        map.serialize_entry("height", &size.height)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Str(String),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageSizeDef::Map { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}
