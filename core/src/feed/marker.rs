use crate::api::{Category, DisasterRecord, GeoPoint};
use crate::feed::timestamp::TimestampFormatter;
use std::fmt;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Circle-marker appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub color: Rgb,
    pub fill_opacity: f32,
}

impl MarkerStyle {
    const RADIUS: f32 = 8.0;
    const FILL_OPACITY: f32 = 0.7;

    pub fn for_category(category: &Category) -> Self {
        let color = match category {
            Category::Flood => Rgb(0x0d, 0x6e, 0xfd),
            Category::Fire => Rgb(0xdc, 0x35, 0x45),
            Category::Other(_) => Rgb(0x6c, 0x75, 0x7d),
        };
        Self {
            radius: Self::RADIUS,
            color,
            fill_opacity: Self::FILL_OPACITY,
        }
    }
}

/// Text bound to a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub confidence: String,
    pub detected: String,
    pub image_link: Option<String>,
}

impl Popup {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.title.clone(),
            format!("Confidence: {}", self.confidence),
            format!("Detected: {}", self.detected),
        ];
        if let Some(link) = &self.image_link {
            lines.push(format!("View Image: {link}"));
        }
        lines
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// `0.95` -> `95.0%`
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub category: Category,
    pub position: GeoPoint,
    pub style: MarkerStyle,
    pub popup: Popup,
}

impl Marker {
    pub fn from_record(record: &DisasterRecord, formatter: &TimestampFormatter) -> Self {
        let popup = Popup {
            title: record.category.as_str().to_uppercase(),
            confidence: format_confidence(record.confidence),
            detected: formatter.format(record.observed_at.as_ref()),
            image_link: record.image().map(str::to_string),
        };
        Self {
            category: record.category.clone(),
            position: record.position,
            style: MarkerStyle::for_category(&record.category),
            popup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RawTimestamp;
    use crate::feed::timestamp::DisplayZone;

    fn utc() -> TimestampFormatter {
        TimestampFormatter::new(DisplayZone::Utc)
    }

    #[test]
    fn flood_record_popup_has_no_image_link() {
        let record = DisasterRecord::new(
            "flood",
            GeoPoint::new(77.2, 28.6),
            0.95,
            Some(RawTimestamp::Text("2024-01-01T00:00:00Z".into())),
            None,
        );
        let marker = Marker::from_record(&record, &utc());
        let text = marker.popup.to_string();
        assert!(text.contains("FLOOD"));
        assert!(text.contains("95.0%"));
        assert!(text.contains("2024-01-01 00:00:00"));
        assert!(!text.contains("View Image"));
        assert_eq!(marker.position, GeoPoint::new(77.2, 28.6));
        assert_eq!(marker.style.color.hex(), "#0d6efd");
    }

    #[test]
    fn image_link_is_rendered_when_present() {
        let record = DisasterRecord::new(
            "fire",
            GeoPoint::new(0.0, 0.0),
            0.123,
            None,
            Some("https://example.com/a.jpg".into()),
        );
        let marker = Marker::from_record(&record, &utc());
        assert_eq!(marker.popup.confidence, "12.3%");
        assert_eq!(
            marker.popup.lines().last().unwrap(),
            "View Image: https://example.com/a.jpg"
        );
    }

    #[test]
    fn unknown_category_gets_fallback_style() {
        let record = DisasterRecord::new("quake", GeoPoint::new(0.0, 0.0), 1.0, None, None);
        let marker = Marker::from_record(&record, &utc());
        assert_eq!(marker.popup.title, "QUAKE");
        assert_eq!(marker.style.color.hex(), "#6c757d");
        assert_eq!(marker.popup.confidence, "100.0%");
    }
}
