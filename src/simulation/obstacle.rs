//! Obstacle shapes and layout generators.

use geo::{Contains, Coord, Rect};
use serde::{Deserialize, Serialize};

use super::context::SimContext;

/// Obstacle geometry variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Solid rectangular wall.
    Wall,
    /// Circle inscribed in the bounding box.
    Circle,
    /// Two rectangles forming an L corner.
    LShape,
    /// Wall with two gap bands agents can pass through.
    Corridor,
}

/// Named obstacle layouts for the regenerate command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstaclePattern {
    /// A handful of randomly placed mixed shapes.
    Random,
    /// Grid walls with gaps and circles at intersections.
    Maze,
    /// Border walls around a central structure.
    Arena,
    /// Four rooms with doorways and clutter.
    Rooms,
    /// Wall segments along an expanding spiral.
    Spiral,
    /// No obstacles.
    Clear,
}

impl ObstaclePattern {
    /// All patterns, in display order.
    pub const ALL: [ObstaclePattern; 6] = [
        ObstaclePattern::Random,
        ObstaclePattern::Maze,
        ObstaclePattern::Arena,
        ObstaclePattern::Rooms,
        ObstaclePattern::Spiral,
        ObstaclePattern::Clear,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ObstaclePattern::Random => "Random",
            ObstaclePattern::Maze => "Maze",
            ObstaclePattern::Arena => "Arena",
            ObstaclePattern::Rooms => "Rooms",
            ObstaclePattern::Spiral => "Spiral",
            ObstaclePattern::Clear => "Clear",
        }
    }
}

/// An impassable region of the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner of the bounding box.
    pub x: f32,
    /// Top-left corner of the bounding box.
    pub y: f32,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height.
    pub height: f32,
    /// Geometry variant.
    pub shape: ObstacleShape,
    /// Inactive obstacles neither block nor render.
    pub active: bool,
}

impl Obstacle {
    /// Creates an obstacle from its bounding box.
    pub fn new(x: f32, y: f32, width: f32, height: f32, shape: ObstacleShape) -> Self {
        Self {
            x,
            y,
            width,
            height,
            shape,
            active: true,
        }
    }

    fn bounding_rect(&self) -> Rect<f32> {
        Rect::new(
            Coord { x: self.x, y: self.y },
            Coord {
                x: self.x + self.width,
                y: self.y + self.height,
            },
        )
    }

    /// Radius of the inscribed circle (circle shape only).
    pub fn radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    /// Center of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether a horizontal fraction across the box falls in a corridor gap.
    fn in_gap(&self, px: f32) -> bool {
        let rel = (px - self.x) / self.width;
        (rel > 0.35 && rel < 0.45) || (rel > 0.55 && rel < 0.65)
    }

    /// Point containment test.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let point = geo::point!(x: px, y: py);
        match self.shape {
            ObstacleShape::Wall => self.bounding_rect().contains(&point),
            ObstacleShape::Circle => {
                let (cx, cy) = self.center();
                let (dx, dy) = (px - cx, py - cy);
                dx * dx + dy * dy <= self.radius() * self.radius()
            }
            ObstacleShape::LShape => {
                let vertical = Rect::new(
                    Coord { x: self.x, y: self.y },
                    Coord {
                        x: self.x + self.width * 0.3,
                        y: self.y + self.height,
                    },
                );
                let horizontal = Rect::new(
                    Coord {
                        x: self.x,
                        y: self.y + self.height * 0.7,
                    },
                    Coord {
                        x: self.x + self.width,
                        y: self.y + self.height,
                    },
                );
                vertical.contains(&point) || horizontal.contains(&point)
            }
            ObstacleShape::Corridor => self.bounding_rect().contains(&point) && !self.in_gap(px),
        }
    }

    /// Whether a circle of `radius` around the point overlaps the obstacle.
    pub fn intersects(&self, px: f32, py: f32, radius: f32) -> bool {
        match self.shape {
            ObstacleShape::Wall => circle_rect_overlap(px, py, radius, self.bounding_rect()),
            ObstacleShape::Circle => {
                let (cx, cy) = self.center();
                let (dx, dy) = (px - cx, py - cy);
                let reach = self.radius() + radius;
                dx * dx + dy * dy <= reach * reach
            }
            ObstacleShape::LShape => {
                let vertical = Rect::new(
                    Coord { x: self.x, y: self.y },
                    Coord {
                        x: self.x + self.width * 0.3,
                        y: self.y + self.height,
                    },
                );
                let horizontal = Rect::new(
                    Coord {
                        x: self.x,
                        y: self.y + self.height * 0.7,
                    },
                    Coord {
                        x: self.x + self.width,
                        y: self.y + self.height,
                    },
                );
                circle_rect_overlap(px, py, radius, vertical)
                    || circle_rect_overlap(px, py, radius, horizontal)
            }
            ObstacleShape::Corridor => {
                circle_rect_overlap(px, py, radius, self.bounding_rect()) && !self.in_gap(px)
            }
        }
    }
}

/// Circle vs. axis-aligned rectangle overlap via the clamped closest point.
fn circle_rect_overlap(px: f32, py: f32, radius: f32, rect: Rect<f32>) -> bool {
    let closest_x = px.clamp(rect.min().x, rect.max().x);
    let closest_y = py.clamp(rect.min().y, rect.max().y);
    let (dx, dy) = (px - closest_x, py - closest_y);
    dx * dx + dy * dy < radius * radius
}

/// Generates a named obstacle layout for an arena of the given size.
pub fn generate_layout(
    pattern: ObstaclePattern,
    arena_w: f32,
    arena_h: f32,
    count: usize,
    ctx: &mut SimContext,
) -> Vec<Obstacle> {
    match pattern {
        ObstaclePattern::Random => random_layout(arena_w, arena_h, count, ctx),
        ObstaclePattern::Maze => maze_layout(arena_w, arena_h, ctx),
        ObstaclePattern::Arena => arena_layout(arena_w, arena_h),
        ObstaclePattern::Rooms => rooms_layout(arena_w, arena_h, ctx),
        ObstaclePattern::Spiral => spiral_layout(arena_w, arena_h, ctx),
        ObstaclePattern::Clear => Vec::new(),
    }
}

fn random_shape(ctx: &mut SimContext) -> ObstacleShape {
    match ctx.range(0.0, 4.0) as u32 {
        0 => ObstacleShape::Wall,
        1 => ObstacleShape::Circle,
        2 => ObstacleShape::LShape,
        _ => ObstacleShape::Corridor,
    }
}

fn random_layout(arena_w: f32, arena_h: f32, count: usize, ctx: &mut SimContext) -> Vec<Obstacle> {
    (0..count)
        .map(|_| {
            let x = ctx.range(100.0, arena_w - 200.0);
            let y = ctx.range(100.0, arena_h - 200.0);
            let w = ctx.range(50.0, 150.0);
            let h = ctx.range(50.0, 150.0);
            Obstacle::new(x, y, w, h, random_shape(ctx))
        })
        .collect()
}

fn maze_layout(arena_w: f32, arena_h: f32, ctx: &mut SimContext) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();
    let thickness = 15.0;
    let grid = 4;
    let cell_w = (arena_w - 200.0) / grid as f32;
    let cell_h = (arena_h - 200.0) / grid as f32;

    for i in 0..grid {
        let y = 100.0 + i as f32 * cell_h;
        let x = 100.0 + i as f32 * cell_w;
        for j in 0..grid {
            if ctx.chance(0.6) {
                let wx = 100.0 + j as f32 * cell_w;
                obstacles.push(Obstacle::new(wx, y, cell_w * 0.8, thickness, ObstacleShape::Wall));
            }
            if ctx.chance(0.6) {
                let wy = 100.0 + j as f32 * cell_h;
                obstacles.push(Obstacle::new(x, wy, thickness, cell_h * 0.8, ObstacleShape::Wall));
            }
        }
    }

    for i in 1..grid {
        for j in 1..grid {
            if ctx.chance(0.3) {
                let x = 100.0 + i as f32 * cell_w - 20.0;
                let y = 100.0 + j as f32 * cell_h - 20.0;
                obstacles.push(Obstacle::new(x, y, 40.0, 40.0, ObstacleShape::Circle));
            }
        }
    }

    obstacles
}

fn arena_layout(arena_w: f32, arena_h: f32) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();
    let thickness = 20.0;

    // Border walls.
    obstacles.push(Obstacle::new(50.0, 50.0, arena_w - 100.0, thickness, ObstacleShape::Wall));
    obstacles.push(Obstacle::new(50.0, arena_h - 70.0, arena_w - 100.0, thickness, ObstacleShape::Wall));
    obstacles.push(Obstacle::new(50.0, 50.0, thickness, arena_h - 100.0, ObstacleShape::Wall));
    obstacles.push(Obstacle::new(arena_w - 70.0, 50.0, thickness, arena_h - 100.0, ObstacleShape::Wall));

    let (cx, cy) = (arena_w / 2.0, arena_h / 2.0);
    obstacles.push(Obstacle::new(cx - 60.0, cy - 60.0, 120.0, 120.0, ObstacleShape::Circle));

    // Corner chambers.
    obstacles.push(Obstacle::new(150.0, 150.0, 100.0, 100.0, ObstacleShape::LShape));
    obstacles.push(Obstacle::new(arena_w - 250.0, 150.0, 100.0, 100.0, ObstacleShape::LShape));
    obstacles.push(Obstacle::new(150.0, arena_h - 250.0, 100.0, 100.0, ObstacleShape::LShape));
    obstacles.push(Obstacle::new(arena_w - 250.0, arena_h - 250.0, 100.0, 100.0, ObstacleShape::LShape));

    // Passages toward the center.
    obstacles.push(Obstacle::new(cx - 150.0, cy - 10.0, 120.0, 20.0, ObstacleShape::Corridor));
    obstacles.push(Obstacle::new(cx + 30.0, cy - 10.0, 120.0, 20.0, ObstacleShape::Corridor));
    obstacles.push(Obstacle::new(cx - 10.0, cy - 150.0, 20.0, 120.0, ObstacleShape::Corridor));
    obstacles.push(Obstacle::new(cx - 10.0, cy + 30.0, 20.0, 120.0, ObstacleShape::Corridor));

    obstacles
}

fn rooms_layout(arena_w: f32, arena_h: f32, ctx: &mut SimContext) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();
    let thickness = 15.0;
    let (mid_x, mid_y) = (arena_w / 2.0, arena_h / 2.0);

    // Dividers with doorway gaps.
    obstacles.push(Obstacle::new(100.0, mid_y - thickness / 2.0, mid_x - 150.0, thickness, ObstacleShape::Wall));
    obstacles.push(Obstacle::new(mid_x + 50.0, mid_y - thickness / 2.0, arena_w - mid_x - 150.0, thickness, ObstacleShape::Wall));
    obstacles.push(Obstacle::new(mid_x - thickness / 2.0, 100.0, thickness, mid_y - 150.0, ObstacleShape::Wall));
    obstacles.push(Obstacle::new(mid_x - thickness / 2.0, mid_y + 50.0, thickness, arena_h - mid_y - 150.0, ObstacleShape::Wall));

    // Clutter per room.
    for (rx, ry) in [
        (arena_w * 0.25, arena_h * 0.25),
        (arena_w * 0.75, arena_h * 0.25),
        (arena_w * 0.25, arena_h * 0.75),
        (arena_w * 0.75, arena_h * 0.75),
    ] {
        let pieces = 1 + ctx.range(0.0, 3.0) as usize;
        for _ in 0..pieces {
            let x = rx + ctx.range(-80.0, 80.0);
            let y = ry + ctx.range(-80.0, 80.0);
            let w = ctx.range(30.0, 70.0);
            let h = ctx.range(30.0, 70.0);
            let shape = if ctx.coin() {
                ObstacleShape::Circle
            } else {
                ObstacleShape::Wall
            };
            obstacles.push(Obstacle::new(x, y, w, h, shape));
        }
    }

    obstacles
}

fn spiral_layout(arena_w: f32, arena_h: f32, ctx: &mut SimContext) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();
    let thickness = 15.0;
    let (cx, cy) = (arena_w / 2.0, arena_h / 2.0);

    let segments = 20;
    let angle_step = std::f32::consts::TAU / segments as f32;
    let radius_step = 15.0;

    for i in 0..segments {
        let angle = i as f32 * angle_step;
        let radius = 50.0 + i as f32 * radius_step;
        let x = cx + angle.cos() * radius;
        let y = cy + angle.sin() * radius;

        let next_angle = (i + 1) as f32 * angle_step;
        let next_radius = 50.0 + (i + 1) as f32 * radius_step;
        let next_x = cx + next_angle.cos() * next_radius;
        let next_y = cy + next_angle.sin() * next_radius;

        let length = ((next_x - x).powi(2) + (next_y - y).powi(2)).sqrt();
        obstacles.push(Obstacle::new(
            x - thickness / 2.0,
            y - thickness / 2.0,
            length,
            thickness,
            ObstacleShape::Wall,
        ));
    }

    for i in 0..8 {
        let angle = i as f32 * std::f32::consts::FRAC_PI_4;
        let radius = 150.0 + ctx.range(-30.0, 30.0);
        let x = cx + angle.cos() * radius - 20.0;
        let y = cy + angle.sin() * radius - 20.0;
        obstacles.push(Obstacle::new(x, y, 40.0, 40.0, ObstacleShape::Circle));
    }

    obstacles
}
