//! Grid world and ray caster for the `raycast` demo.

use fbgl::Color;

pub const MAP_WIDTH: usize = 8;
pub const MAP_HEIGHT: usize = 8;

/// Rows top to bottom; `#` is a wall.
pub const MAP: [&[u8; MAP_WIDTH]; MAP_HEIGHT] = [
    b"########",
    b"#      #",
    b"# ## # #",
    b"# #  # #",
    b"# # ## #",
    b"#      #",
    b"# #### #",
    b"########",
];

/// Rays give up after this many tiles.
pub const MAX_DEPTH: f32 = 16.0;
const RAY_STEP: f32 = 0.1;
pub const MOVE_SPEED: f32 = 2.0 / 64.0;
pub const TURN_SPEED: f32 = 0.1;

pub const WALL_X: Color = Color::rgb(150, 150, 255);
pub const WALL_Y: Color = Color::rgb(255, 150, 150);

pub fn is_wall(x: f32, y: f32) -> bool {
    if x < 0.0 || y < 0.0 {
        return true;
    }
    let (tx, ty) = (x as usize, y as usize);
    tx >= MAP_WIDTH || ty >= MAP_HEIGHT || MAP[ty][tx] == b'#'
}

/// Camera position in tile units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 1.5,
            y: 1.5,
            angle: 0.0,
            fov: std::f32::consts::FRAC_PI_4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub distance: f32,
    /// The ray ran mostly along x, so it struck an x-facing wall.
    pub vertical: bool,
}

impl Camera {
    /// March a ray at `angle` until it enters a wall or runs out of depth.
    pub fn cast(&self, angle: f32) -> Hit {
        let (eye_y, eye_x) = angle.sin_cos();
        let mut distance = 0.0;
        while distance < MAX_DEPTH {
            distance += RAY_STEP;
            let tx = self.x + eye_x * distance;
            let ty = self.y + eye_y * distance;
            if tx < 0.0 || ty < 0.0 || tx >= MAP_WIDTH as f32 || ty >= MAP_HEIGHT as f32 {
                break;
            }
            if is_wall(tx, ty) {
                return Hit {
                    distance,
                    vertical: eye_x.abs() > eye_y.abs(),
                };
            }
        }
        Hit {
            distance: MAX_DEPTH,
            vertical: false,
        }
    }

    /// Angle of screen column `col` out of `width`.
    pub fn ray_angle(&self, col: usize, width: usize) -> f32 {
        self.angle - self.fov / 2.0 + self.fov * col as f32 / width as f32
    }

    /// Step along the view direction (negative goes back), sliding along
    /// walls one axis at a time.
    pub fn walk(&mut self, amount: f32) {
        let (sin, cos) = self.angle.sin_cos();
        let nx = self.x + cos * amount;
        let ny = self.y + sin * amount;
        if !is_wall(nx, self.y) {
            self.x = nx;
        }
        if !is_wall(self.x, ny) {
            self.y = ny;
        }
    }

    pub fn turn(&mut self, amount: f32) {
        self.angle += amount;
    }
}

/// Darken `base` with distance.
pub fn shade(base: Color, distance: f32) -> Color {
    base.scale(1.0 / (distance + 1.0))
}

/// Height in pixels of a wall slice at `distance`.
pub fn wall_height(screen_height: usize, distance: f32) -> i32 {
    (screen_height as f32 / distance) as i32
}
