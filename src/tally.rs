use crate::blocks::ColorCounts;
use crate::color::Color;

/// One row of the palette usage table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageEntry {
    /// `#RRGGBB`
    pub hex: String,
    pub count: usize,
    /// Label color that stays readable on top of the swatch.
    pub text_color: String,
}

/// How many output cells ended up with each palette color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageTally {
    counts: ColorCounts,
}

impl UsageTally {
    pub fn new(palette: &[Color]) -> Self {
        Self {
            counts: ColorCounts::seeded(palette),
        }
    }

    /// Tally a row-major sequence of cell colors.
    pub fn from_cells(palette: &[Color], cells: &[Color]) -> Self {
        let mut tally = Self::new(palette);
        for &c in cells {
            tally.record(c);
        }
        tally
    }

    pub fn record(&mut self, color: Color) {
        self.counts.record(color);
    }

    pub fn count(&self, color: Color) -> usize {
        self.counts.count(color)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Every palette color, zeros included, in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, usize)> + '_ {
        self.counts.iter()
    }

    /// Used colors only, most frequent first. Ties keep palette order.
    pub fn ranked(&self) -> Vec<(Color, usize)> {
        let mut used: Vec<(Color, usize)> = self.counts.iter().filter(|&(_, n)| n > 0).collect();
        used.sort_by(|a, b| b.1.cmp(&a.1));
        used
    }

    pub fn report(&self) -> Vec<UsageEntry> {
        self.ranked()
            .into_iter()
            .map(|(color, count)| UsageEntry {
                hex: color.to_hex(),
                count,
                text_color: color.contrasting_text().to_hex(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Color = Color::new(255, 0, 0);
    const YELLOW: Color = Color::new(255, 255, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    #[test]
    fn test_unused_colors_report_zero() {
        let tally = UsageTally::from_cells(&[RED, YELLOW, BLUE], &[RED, RED]);
        assert_eq!(
            tally.iter().collect::<Vec<_>>(),
            vec![(RED, 2), (YELLOW, 0), (BLUE, 0)]
        );
        assert_eq!(tally.count(BLUE), 0);
        assert_eq!(tally.total(), 2);
    }

    #[test]
    fn test_ranked_drops_zeros_and_sorts() {
        let cells = [BLUE, RED, BLUE, BLUE, RED];
        let tally = UsageTally::from_cells(&[RED, YELLOW, BLUE], &cells);
        assert_eq!(tally.ranked(), vec![(BLUE, 3), (RED, 2)]);
    }

    #[test]
    fn test_ranked_ties_keep_palette_order() {
        let tally = UsageTally::from_cells(&[YELLOW, RED], &[RED, YELLOW]);
        assert_eq!(tally.ranked(), vec![(YELLOW, 1), (RED, 1)]);
    }

    #[test]
    fn test_report_formats_hex_and_label() {
        let tally = UsageTally::from_cells(&[RED, YELLOW], &[YELLOW, YELLOW, RED]);
        assert_eq!(
            tally.report(),
            vec![
                UsageEntry {
                    hex: "#FFFF00".to_string(),
                    count: 2,
                    text_color: "#000000".to_string(),
                },
                UsageEntry {
                    hex: "#FF0000".to_string(),
                    count: 1,
                    text_color: "#FFFFFF".to_string(),
                },
            ]
        );
    }
}
