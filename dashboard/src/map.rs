use crate::config::MapView;
use disastercore::feed::{LayerKind, LayerSet};
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Theme,
};
use std::f64::consts::PI;

const TILE_SIZE: f64 = 256.0;
const GRID_STEP_DEG: f64 = 5.0;

/// Web-Mercator projection centred on the configured view.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    center: (f64, f64),
    scale: f64,
}

impl Projection {
    pub fn new(view: &MapView) -> Self {
        let scale = TILE_SIZE * 2f64.powf(view.zoom);
        Self {
            center: world(view.center_lon, view.center_lat, scale),
            scale,
        }
    }

    /// Screen offset from the canvas centre, y growing downward.
    pub fn offset(&self, longitude: f64, latitude: f64) -> (f64, f64) {
        let (x, y) = world(longitude, latitude, self.scale);
        (x - self.center.0, y - self.center.1)
    }

    fn to_screen(&self, longitude: f64, latitude: f64, bounds: &Rectangle) -> Point {
        let (dx, dy) = self.offset(longitude, latitude);
        Point::new(
            bounds.width / 2.0 + dx as f32,
            bounds.height / 2.0 + dy as f32,
        )
    }
}

fn world(longitude: f64, latitude: f64, scale: f64) -> (f64, f64) {
    let x = (longitude + 180.0) / 360.0 * scale;
    let sin_lat = latitude.to_radians().sin().clamp(-0.9999, 0.9999);
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale;
    (x, y)
}

#[derive(Debug, Clone)]
struct MapMarker {
    longitude: f64,
    latitude: f64,
    color: [u8; 3],
    radius: f32,
    opacity: f32,
    selected: bool,
}

/// Canvas program drawing the markers of every attached layer.
#[derive(Debug, Clone)]
pub struct MarkerMap {
    projection: Projection,
    markers: Vec<MapMarker>,
}

impl MarkerMap {
    pub fn new(view: &MapView, layers: &LayerSet, selected: Option<(LayerKind, usize)>) -> Self {
        let markers = layers
            .visible_markers()
            .map(|(kind, idx, marker)| MapMarker {
                longitude: marker.position.longitude,
                latitude: marker.position.latitude,
                color: [marker.style.color.0, marker.style.color.1, marker.style.color.2],
                radius: marker.style.radius,
                opacity: marker.style.fill_opacity,
                selected: selected == Some((kind, idx)),
            })
            .collect();
        Self {
            projection: Projection::new(view),
            markers,
        }
    }
}

impl<Message> canvas::Program<Message> for MarkerMap {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.06, 0.08, 0.11),
        );

        let grid = || {
            Stroke::default()
                .with_color(Color::from_rgb(0.18, 0.2, 0.26))
                .with_width(1.0)
        };
        let mut degree: f64 = -180.0;
        while degree <= 180.0 {
            let top = self.projection.to_screen(degree, 85.0, &bounds);
            let bottom = self.projection.to_screen(degree, -85.0, &bounds);
            frame.stroke(&Path::line(top, bottom), grid());
            if degree.abs() <= 85.0 {
                let west = self.projection.to_screen(-180.0, degree, &bounds);
                let east = self.projection.to_screen(180.0, degree, &bounds);
                frame.stroke(&Path::line(west, east), grid());
            }
            degree += GRID_STEP_DEG;
        }

        // selected marker last so it sits on top
        let mut ordered: Vec<&MapMarker> = self.markers.iter().collect();
        ordered.sort_by_key(|marker| marker.selected);
        for marker in ordered {
            let center = self
                .projection
                .to_screen(marker.longitude, marker.latitude, &bounds);
            let [r, g, b] = marker.color;
            let circle = Path::circle(center, marker.radius);
            frame.fill(&circle, Color::from_rgba8(r, g, b, marker.opacity));
            frame.stroke(
                &circle,
                Stroke::default()
                    .with_color(Color::from_rgb8(r, g, b))
                    .with_width(2.0),
            );
            if marker.selected {
                let ring = Path::circle(center, marker.radius + 4.0);
                frame.stroke(
                    &ring,
                    Stroke::default().with_color(Color::WHITE).with_width(2.0),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}
