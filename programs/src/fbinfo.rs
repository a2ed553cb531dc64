//! Print what the framebuffer reports about itself.

use anyhow::Result;
use clap::Parser;
use fbgl_programs::DisplayArgs;

#[derive(Parser)]
#[command(about = "Show framebuffer geometry and pixel format")]
struct Cli {
    #[command(flatten)]
    display: DisplayArgs,
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let fb = cli.display.open()?;

    let format = fb.format();
    let fix = fb.fix_screeninfo();
    let var = fb.var_screeninfo();

    println!("{} {}", fbgl::name(), fbgl::version());
    println!("Framebuffer id: {}", fix.id_str());
    println!("Framebuffer width: {}", fb.width());
    println!("Framebuffer height: {}", fb.height());
    println!("Framebuffer screen size: {}", fb.screen_size());
    println!("Line length: {}", fb.stride());
    println!("Virtual size: {}x{}", var.xres_virtual, var.yres_virtual);
    println!("Bits per pixel: {}", format.bits_per_pixel());
    println!(
        "Channels: red {}/{} green {}/{} blue {}/{} alpha {}/{}",
        format.red.offset,
        format.red.length,
        format.green.offset,
        format.green.length,
        format.blue.offset,
        format.blue.length,
        format.transp.offset,
        format.transp.length
    );
    Ok(())
}
