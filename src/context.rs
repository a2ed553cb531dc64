//! The drawing context: one open screen plus optional back buffer.

use std::path::Path;

use libfbdev::{FbDevice, FbFixScreeninfo, FbVarScreeninfo, Screen, VirtualFb};
use libfbgfx::shapes::{self, Point};
use libfbgfx::text::{self, Font};
use libfbgfx::texture::{self, Texture};
use libfbgfx::{Canvas, Color, DirtyRect, FrameBuf, PixelFormat};

use crate::config::Config;
use crate::error::Result;
use crate::fps::FpsCounter;
use crate::snapshot::{self, ImageKind};

pub struct Fbgl {
    screen: Box<dyn Screen>,
    back: Option<FrameBuf<Vec<u8>>>,
    fps: FpsCounter,
    bg: Color,
}

impl Fbgl {
    /// Open the display described by `config`.
    pub fn init(config: &Config) -> Result<Self> {
        let screen: Box<dyn Screen> = match &config.emulate {
            Some(path) => Box::new(VirtualFb::create(path, config.emu_width, config.emu_height)?),
            None => Box::new(FbDevice::open(&config.device)?),
        };
        Ok(Self::with_screen(screen, config.double_buffer))
    }

    /// Wrap an already open screen.
    pub fn with_screen(screen: Box<dyn Screen>, double_buffer: bool) -> Self {
        let back = double_buffer.then(|| {
            let fb = screen.frame_buf();
            FrameBuf::alloc(fb.width(), fb.height(), fb.format())
        });
        log::info!(
            "fbgl ready: {}x{} {}bpp{}",
            screen.frame_buf().width(),
            screen.frame_buf().height(),
            screen.frame_buf().format().bits_per_pixel(),
            if back.is_some() { ", double buffered" } else { "" }
        );
        Self {
            screen,
            back,
            fps: FpsCounter::new(),
            bg: Color::BLACK,
        }
    }

    pub fn width(&self) -> usize {
        self.screen.frame_buf().width()
    }

    pub fn height(&self) -> usize {
        self.screen.frame_buf().height()
    }

    /// Size of the mapped pixel memory in bytes (`smem_len`).
    pub fn screen_size(&self) -> usize {
        match self.screen.fix_screeninfo().smem_len as usize {
            0 => self.stride() * self.height(),
            n => n,
        }
    }

    pub fn stride(&self) -> usize {
        self.screen.frame_buf().stride()
    }

    pub fn format(&self) -> PixelFormat {
        self.screen.frame_buf().format()
    }

    pub fn var_screeninfo(&self) -> FbVarScreeninfo {
        self.screen.var_screeninfo()
    }

    pub fn fix_screeninfo(&self) -> FbFixScreeninfo {
        self.screen.fix_screeninfo()
    }

    pub fn is_double_buffered(&self) -> bool {
        self.back.is_some()
    }

    /// Where drawing goes: the back buffer if there is one, else the screen.
    pub fn canvas(&mut self) -> &mut dyn Canvas {
        match &mut self.back {
            Some(back) => back as &mut dyn Canvas,
            None => self.screen.frame_buf_mut() as &mut dyn Canvas,
        }
    }

    fn canvas_ref(&self) -> &dyn Canvas {
        match &self.back {
            Some(back) => back as &dyn Canvas,
            None => self.screen.frame_buf() as &dyn Canvas,
        }
    }

    pub fn bg(&self) -> Color {
        self.bg
    }

    /// Fill the whole drawing surface and remember the color.
    pub fn set_bg(&mut self, color: Color) {
        self.bg = color;
        self.canvas().clear(color);
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.canvas().put_pixel(x, y, color);
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.canvas_ref().get_pixel(x, y)
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        shapes::draw_line(self.canvas(), Point::new(x0, y0), Point::new(x1, y1), color);
    }

    pub fn draw_rectangle_outline(&mut self, top_left: Point, bottom_right: Point, color: Color) {
        shapes::draw_rectangle_outline(self.canvas(), top_left, bottom_right, color);
    }

    pub fn draw_rectangle_filled(&mut self, top_left: Point, bottom_right: Point, color: Color) {
        shapes::draw_rectangle_filled(self.canvas(), top_left, bottom_right, color);
    }

    pub fn draw_circle_outline(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        shapes::draw_circle(self.canvas(), cx, cy, radius, color);
    }

    pub fn draw_circle_filled(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        shapes::fill_circle(self.canvas(), cx, cy, radius, color);
    }

    pub fn draw_texture(&mut self, tex: &Texture, x: i32, y: i32) {
        texture::draw_texture(self.canvas(), tex, x, y);
    }

    /// Draw text with `font`; returns the area the text covers.
    pub fn render_text(&mut self, font: &dyn Font, s: &str, x: i32, y: i32, color: Color) -> DirtyRect {
        text::draw_text(self.canvas(), font, s, x, y, color)
    }

    /// Finish the frame: copy the back buffer's dirty area to the screen,
    /// present it, and count it.
    pub fn display(&mut self) -> Result<()> {
        match &mut self.back {
            Some(back) => {
                if let Some(rect) = back.take_dirty() {
                    self.screen.frame_buf_mut().copy_rect_from(back, rect)?;
                }
            }
            None => {
                self.screen.frame_buf_mut().take_dirty();
            }
        }
        self.screen.present()?;
        self.fps.tick();
        Ok(())
    }

    /// Frames per second over the last full second of `display()` calls.
    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }

    pub fn frames(&self) -> u64 {
        self.fps.total_frames()
    }

    /// Owned copy of what is currently on screen.
    pub fn snapshot(&self) -> Result<FrameBuf<Vec<u8>>> {
        snapshot::copy_frame(self.screen.frame_buf())
    }

    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<()> {
        snapshot::save(self.screen.frame_buf(), path.as_ref(), ImageKind::Ppm)
    }

    pub fn save_bmp(&self, path: impl AsRef<Path>) -> Result<()> {
        snapshot::save(self.screen.frame_buf(), path.as_ref(), ImageKind::Bmp)
    }
}

impl Drop for Fbgl {
    fn drop(&mut self) {
        log::debug!("fbgl closed after {} frames", self.fps.total_frames());
    }
}
