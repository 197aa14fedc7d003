//! Components - the building blocks of a canvas page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(Uuid);

impl ComponentId {
    /// Create a new unique component ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The device a layout applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKey {
    /// Desktop canvas.
    Desktop,
    /// Mobile canvas.
    Mobile,
}

/// Geometry of a component on one device canvas.
///
/// `left` is a percentage of the canvas width so layouts survive
/// viewport resizes; `width` is a whole number of grid columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Offset from the canvas top in pixels.
    pub top: f32,
    /// Offset from the canvas left edge as a percentage (0-100).
    pub left: f32,
    /// Width in grid columns (1..=COLUMN_COUNT).
    pub width: u32,
    /// Height in pixels.
    pub height: f32,
}

impl Layout {
    /// Create a layout at the given position.
    #[must_use]
    pub fn new(top: f32, left: f32, width: u32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge in pixels (`top + height`).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            width: 6,
            height: 40.0,
        }
    }
}

/// A layout resolved for a specific device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLayout {
    /// The effective geometry.
    pub layout: Layout,
    /// True when the device has no explicit layout and inherits the
    /// desktop one.
    pub inherited: bool,
}

/// Per-device layouts for a component.
///
/// Mobile is an explicit variant rather than a null fallthrough: until
/// the component is first edited on mobile it inherits the desktop
/// layout, and [`LayoutSet::materialize`] pins an explicit copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSet {
    /// Desktop geometry, always present.
    pub desktop: Layout,
    /// Mobile geometry; `None` means "inherit desktop".
    pub mobile: Option<Layout>,
}

impl LayoutSet {
    /// Create a layout set with only a desktop layout.
    #[must_use]
    pub fn new(desktop: Layout) -> Self {
        Self {
            desktop,
            mobile: None,
        }
    }

    /// Resolve the effective layout for a device.
    #[must_use]
    pub fn resolve(&self, device: DeviceKey) -> ResolvedLayout {
        match device {
            DeviceKey::Desktop => ResolvedLayout {
                layout: self.desktop,
                inherited: false,
            },
            DeviceKey::Mobile => match self.mobile {
                Some(layout) => ResolvedLayout {
                    layout,
                    inherited: false,
                },
                None => ResolvedLayout {
                    layout: self.desktop,
                    inherited: true,
                },
            },
        }
    }

    /// Get a mutable reference to the layout for a device,
    /// materializing an explicit mobile layout from desktop on first
    /// mobile access.
    pub fn materialize(&mut self, device: DeviceKey) -> &mut Layout {
        match device {
            DeviceKey::Desktop => &mut self.desktop,
            DeviceKey::Mobile => {
                let desktop = self.desktop;
                self.mobile.get_or_insert(desktop)
            }
        }
    }
}

/// Widget configuration payload.
///
/// Opaque to the layout engine; owned by the widget-registry
/// collaborator and carried through patches untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Widget properties (e.g. label text, data bindings).
    pub properties: serde_json::Value,
    /// Visual style overrides.
    pub styles: serde_json::Value,
    /// Event handler wiring.
    pub events: serde_json::Value,
    /// Anything else the widget registry attaches.
    pub others: serde_json::Value,
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            properties: serde_json::Value::Object(serde_json::Map::new()),
            styles: serde_json::Value::Object(serde_json::Map::new()),
            events: serde_json::Value::Object(serde_json::Map::new()),
            others: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// A component placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier.
    pub id: ComponentId,
    /// Widget type name (resolved by the widget registry).
    pub widget_type: String,
    /// Parent container, or `None` for top-level components.
    pub parent: Option<ComponentId>,
    /// Widget configuration.
    pub definition: Definition,
    /// Per-device geometry.
    pub layouts: LayoutSet,
}

impl Component {
    /// Create a new component of the given widget type with a desktop
    /// layout.
    #[must_use]
    pub fn new(widget_type: impl Into<String>, layout: Layout) -> Self {
        Self {
            id: ComponentId::new(),
            widget_type: widget_type.into(),
            parent: None,
            definition: Definition::default(),
            layouts: LayoutSet::new(layout),
        }
    }

    /// Set the parent container.
    #[must_use]
    pub fn with_parent(mut self, parent: ComponentId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the widget definition.
    #[must_use]
    pub fn with_definition(mut self, definition: Definition) -> Self {
        self.definition = definition;
        self
    }
}
