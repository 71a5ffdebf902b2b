//! Splits the output surface into the primary and inventory regions and
//! drives one frame of rendering through a [`RenderBackend`].
//!
//! ```text
//!  +----------------------------+--------+
//!  |                            |        |
//!  |          primary           |  inv.  |
//!  |   world pass + overlay     |  world |
//!  |                            |  pass  |
//!  +----------------------------+--------+
//!                                <------> inventory_width
//! ```

use glam::Vec2;

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::draw2d::{Canvas, Color, Rect};
use crate::object::{ObjectId, Stage};
use crate::overlay::Overlay;
use crate::scene_index::Drawable;
use crate::world::World;

/// Map a pixel position inside a region of `size` to normalized device
/// coordinates (`-1..1`, y up).
pub fn pixel_to_ndc(position: Vec2, size: Vec2) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        2.0 * position.x / size.x - 1.0,
        1.0 - 2.0 * position.y / size.y,
    )
}

/// One of the two screen regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Primary,
    Inventory,
}

/// A region's rectangle on the output surface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub region: Region,
    pub rect: Rect,
}

impl Viewport {
    pub fn contains(&self, position: Vec2) -> bool {
        self.rect.contains(position)
    }

    /// `position` relative to the viewport's top-left corner.
    pub fn to_local(&self, position: Vec2) -> Vec2 {
        position - self.rect.min()
    }

    pub fn to_ndc(&self, position: Vec2) -> Vec2 {
        pixel_to_ndc(self.to_local(position), self.size())
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.rect.width, self.rect.height)
    }

    pub fn aspect(&self) -> f32 {
        if self.rect.height > 0.0 {
            self.rect.width / self.rect.height
        } else {
            1.0
        }
    }
}

/// Everything a backend needs to draw one region's 3D content.
pub struct WorldPass<'a> {
    pub viewport: Viewport,
    pub camera: &'a Camera,
    pub aspect: f32,
    pub drawables: &'a [Drawable],
    /// Objects to outline; zero or one entry.
    pub highlight: &'a [ObjectId],
}

/// The renderer the compositor drives.
///
/// Calls arrive in a fixed order per frame: `begin_frame`, the primary
/// `render_world`, `composite_overlay` onto the primary region, the
/// inventory `render_world`, `end_frame`.
pub trait RenderBackend {
    fn begin_frame(&mut self, size: Vec2, background: Color);
    fn render_world(&mut self, pass: &WorldPass<'_>);
    /// Alpha-composite the overlay canvas over `viewport`.
    fn composite_overlay(&mut self, viewport: &Viewport, canvas: &Canvas);
    fn end_frame(&mut self);
}

pub struct RenderCompositor {
    size: Vec2,
    inventory_width: f32,
    background: Color,
}

impl RenderCompositor {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            size: Vec2::new(config.width as f32, config.height as f32),
            inventory_width: config.inventory_width.max(0.0),
            background: config.background,
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size.max(Vec2::ZERO);
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    fn split(&self) -> f32 {
        (self.size.x - self.inventory_width).max(0.0)
    }

    pub fn primary(&self) -> Viewport {
        Viewport {
            region: Region::Primary,
            rect: Rect::new(0.0, 0.0, self.split(), self.size.y),
        }
    }

    pub fn inventory(&self) -> Viewport {
        let split = self.split();
        Viewport {
            region: Region::Inventory,
            rect: Rect::new(split, 0.0, self.size.x - split, self.size.y),
        }
    }

    pub fn viewport(&self, region: Region) -> Viewport {
        match region {
            Region::Primary => self.primary(),
            Region::Inventory => self.inventory(),
        }
    }

    /// Which region owns a pointer at `position`; the inventory band wins.
    pub fn region_at(&self, position: Vec2) -> Option<Region> {
        if position.x < 0.0 || position.y < 0.0 || position.y >= self.size.y {
            return None;
        }
        if position.x >= self.size.x {
            None
        } else if position.x >= self.split() {
            Some(Region::Inventory)
        } else {
            Some(Region::Primary)
        }
    }

    /// Render both regions.
    pub fn render(
        &self,
        backend: &mut dyn RenderBackend,
        world: &World,
        stage: &Stage,
        overlay: &Overlay,
    ) {
        backend.begin_frame(self.size, self.background);

        let primary = self.primary();
        let drawables = stage.scene().world_drawables();
        let highlight = world.highlight();
        backend.render_world(&WorldPass {
            viewport: primary,
            camera: world.camera(),
            aspect: world.aspect(),
            drawables: &drawables,
            highlight: highlight.as_slice(),
        });
        backend.composite_overlay(&primary, overlay.canvas());

        let inventory = stage.inventory();
        let held = stage.scene().inventory_drawables();
        let selected = inventory.highlighted();
        backend.render_world(&WorldPass {
            viewport: self.inventory(),
            camera: inventory.camera(),
            aspect: inventory.aspect(),
            drawables: &held,
            highlight: selected.as_slice(),
        });

        backend.end_frame();
    }
}
