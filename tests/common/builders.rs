//! Test data builders for creating series and documents

use super::day;
use timeline_chart::config::{ChartConfig, ChartDocument};
use timeline_chart::types::{Point, Series, Value};

/// Builder for creating test Series, one point per January day
pub struct SeriesBuilder {
    name: String,
    points: Vec<Point>,
}

impl SeriesBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            points: Vec::new(),
        }
    }

    pub fn value(mut self, d: u32, y: impl Into<Value>) -> Self {
        self.points.push(Point::new(day(d), y));
        self
    }

    pub fn gap(mut self, d: u32) -> Self {
        self.points.push(Point::gap(day(d)));
        self
    }

    /// Consecutive days starting at `first`, one value each
    pub fn values(mut self, first: u32, ys: &[f64]) -> Self {
        for (i, y) in ys.iter().enumerate() {
            self.points.push(Point::new(day(first + i as u32), *y));
        }
        self
    }

    pub fn build(self) -> Series {
        Series::new(self.name, self.points)
    }
}

/// Builder for chart documents
pub struct DocumentBuilder {
    name: String,
    chart: ChartConfig,
    series: Vec<Series>,
}

impl DocumentBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            chart: ChartConfig::default(),
            series: Vec::new(),
        }
    }

    pub fn chart(mut self, chart: ChartConfig) -> Self {
        self.chart = chart;
        self
    }

    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn build(self) -> ChartDocument {
        ChartDocument::new(self.name, self.chart, self.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_builder() {
        let series = SeriesBuilder::new("bugs").value(1, 3.0).gap(2).values(3, &[1.0, 2.0]).build();

        assert_eq!(series.name, "bugs");
        assert_eq!(series.len(), 4);
        assert!(!series.points[1].is_defined());
        assert_eq!(series.points[3].x, day(4));
    }
}
