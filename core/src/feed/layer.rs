use crate::api::Category;
use crate::feed::marker::Marker;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Flood,
    Fire,
    /// Receives every category without a dedicated layer.
    Fallback,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Flood, LayerKind::Fire, LayerKind::Fallback];

    pub fn for_category(category: &Category) -> Self {
        match category {
            Category::Flood => LayerKind::Flood,
            Category::Fire => LayerKind::Fire,
            Category::Other(_) => LayerKind::Fallback,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Flood => "Flood",
            LayerKind::Fire => "Fire",
            LayerKind::Fallback => "Other",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Independently toggleable group of markers.
///
/// Map attachment and the control's active indicator are tracked separately
/// and flipped together, so a hidden layer keeps its markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    kind: LayerKind,
    markers: Vec<Marker>,
    attached: bool,
    control_active: bool,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            markers: Vec::new(),
            attached: true,
            control_active: true,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_control_active(&self) -> bool {
        self.control_active
    }

    /// Drops every marker.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn insert(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn toggle(&mut self) {
        self.attached = !self.attached;
        self.control_active = !self.control_active;
    }
}

/// The three layers the feed renders into.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSet {
    flood: Layer,
    fire: Layer,
    fallback: Layer,
}

impl Default for LayerSet {
    fn default() -> Self {
        Self {
            flood: Layer::new(LayerKind::Flood),
            fire: Layer::new(LayerKind::Fire),
            fallback: Layer::new(LayerKind::Fallback),
        }
    }
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Flood => &self.flood,
            LayerKind::Fire => &self.fire,
            LayerKind::Fallback => &self.fallback,
        }
    }

    fn get_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Flood => &mut self.flood,
            LayerKind::Fire => &mut self.fire,
            LayerKind::Fallback => &mut self.fallback,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        [&self.flood, &self.fire, &self.fallback].into_iter()
    }

    pub fn total_markers(&self) -> usize {
        self.iter().map(Layer::len).sum()
    }

    /// Markers of attached layers, in layer order.
    pub fn visible_markers(&self) -> impl Iterator<Item = (LayerKind, usize, &Marker)> {
        self.iter()
            .filter(|layer| layer.is_attached())
            .flat_map(|layer| {
                layer
                    .markers()
                    .iter()
                    .enumerate()
                    .map(move |(idx, marker)| (layer.kind(), idx, marker))
            })
    }

    pub fn toggle(&mut self, kind: LayerKind) {
        self.get_mut(kind).toggle();
    }

    /// Clears every layer once, then routes the new markers by category.
    pub fn replace_all(&mut self, markers: Vec<Marker>) {
        for kind in LayerKind::ALL {
            self.get_mut(kind).clear();
        }
        for marker in markers {
            let kind = LayerKind::for_category(&marker.category);
            self.get_mut(kind).insert(marker);
        }
    }
}
