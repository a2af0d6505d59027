//! Group control screen configuration: grid layout and which models get a cell.
use crate::grouping::SupportedModels;

/// Size of one grid cell in points.
#[derive(Copy, Clone, PartialOrd, PartialEq, Debug)]
pub struct ItemSize {
    pub width: f64,
    pub height: f64,
}
#[derive(Copy, Clone, PartialOrd, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde-1",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GridLayout {
    pub inset: f64,
    pub standard_size: f64,
    /// Columns that have to fit at `standard_size` before the compact two column layout is dropped.
    pub compact_columns: f64,
}
impl Default for GridLayout {
    fn default() -> Self {
        Self {
            inset: 16.0,
            standard_size: 130.0,
            compact_columns: 3.0,
        }
    }
}
impl GridLayout {
    /// Square `standard_size` cells when `compact_columns` of them fit in `view_width`, otherwise
    /// two cells per row stretched to the view.
    pub fn item_size(&self, view_width: f64) -> ItemSize {
        let width = view_width - self.inset * 2.0;
        let compact_width =
            self.standard_size * self.compact_columns + self.inset * (self.compact_columns - 1.0);
        if width > compact_width {
            ItemSize {
                width: self.standard_size,
                height: self.standard_size,
            }
        } else {
            ItemSize {
                width: width / 2.0 - self.inset / 2.0,
                height: self.standard_size,
            }
        }
    }
}
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(
    feature = "serde-1",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GroupControlConfig {
    pub layout: GridLayout,
    pub supported_models: SupportedModels,
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::ModelID;

    #[test]
    fn test_compact_width() {
        // iPhone SE sized view: 320 - 32 = 288 < 422
        let size = GridLayout::default().item_size(320.0);
        assert_eq!(
            size,
            ItemSize {
                width: 136.0,
                height: 130.0
            }
        );
    }
    #[test]
    fn test_regular_width() {
        let size = GridLayout::default().item_size(768.0);
        assert_eq!(
            size,
            ItemSize {
                width: 130.0,
                height: 130.0
            }
        );
        // Exactly fitting still uses the compact layout.
        let size = GridLayout::default().item_size(422.0 + 32.0);
        assert_eq!(size.width, 211.0 - 8.0);
    }
    #[test]
    fn test_default_supported_models() {
        let config = GroupControlConfig::default();
        assert_eq!(
            config.supported_models.model_ids(),
            &[ModelID(0x1000), ModelID(0x1002)]
        );
    }
    #[cfg(feature = "serde-1")]
    #[test]
    fn test_partial_json() {
        let config: GroupControlConfig =
            serde_json::from_str(r#"{"layout": {"standard_size": 100.0}}"#).unwrap();
        assert_eq!(config.layout.standard_size, 100.0);
        assert_eq!(config.layout.inset, 16.0);
        assert_eq!(config.supported_models, SupportedModels::default());
    }
}
