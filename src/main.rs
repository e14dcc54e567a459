use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use image::RgbaImage;
use ray_tracing_lib::{
    application::{AppState, Application, Layer, Screen, WindowSettings},
    camera::{Camera, CameraController},
    config::load_scene,
    frame::{render_frame, RenderState},
    renderer::FrameBlitter,
    scene::Scene,
    texture::Texture,
};
use wgpu::{CommandEncoderDescriptor, TextureViewDescriptor};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
};

#[derive(Parser, Debug)]
#[command(version, about = "Recursive reflection ray tracer for sphere scenes")]
struct Cli {
    /// Width of the traced frame in pixels
    #[arg(long, global = true, default_value_t = 150)]
    width: u32,

    /// Height of the traced frame in pixels
    #[arg(long, global = true, default_value_t = 150)]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long, global = true, default_value_t = 60.0)]
    fov: f32,

    /// Camera position as `x,y,z`
    #[arg(long, global = true, value_parser = parse_vec3, default_value = "0,0,0")]
    position: glam::Vec3,

    /// Camera forward direction as `x,y,z`
    #[arg(long, global = true, value_parser = parse_vec3, default_value = "1,0,0")]
    forward: glam::Vec3,

    /// TOML scene file; the two-sphere demo scene is used when omitted
    #[arg(long, global = true)]
    scene: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trace a single frame and save it as PNG
    Render {
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,
    },
    /// Open a window; W/A/S/D/Q/E move the camera, F5 re-renders
    View,
}

impl Cli {
    fn render_state(&self) -> RenderState {
        RenderState {
            camera: Camera::new(self.position, self.forward, self.fov),
            width: self.width,
            height: self.height,
        }
    }
}

fn parse_vec3(value: &str) -> Result<glam::Vec3, String> {
    let components = value
        .split(',')
        .map(|c| c.trim().parse::<f32>().map_err(|e| format!("{c:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match components[..] {
        [x, y, z] => Ok(glam::Vec3::new(x, y, z)),
        _ => Err(format!("expected 3 comma separated numbers, got {value:?}")),
    }
}

struct ViewerConfig {
    scene: Scene,
    state: RenderState,
}

struct RayTracingCPU {
    scene: Scene,
    state: RenderState,
    camera_controller: CameraController,
    blitter: FrameBlitter,
    texture: Texture,
    img_texture: RgbaImage,
    frame_bind_group: wgpu::BindGroup,
    dirty: bool,
}

impl Layer for RayTracingCPU {
    type Config = ViewerConfig;
    type LayerErr = ray_tracing_lib::Error;

    fn start(
        config: ViewerConfig,
        screen: &mut Screen,
        _app: &AppState,
    ) -> Result<Self, Self::LayerErr> {
        let ViewerConfig { scene, state } = config;
        let img_texture = render_frame(&state, &scene)?.to_image();
        let texture = Texture::from_image(
            &screen.device,
            &screen.queue,
            &img_texture,
            Some("Frame texture"),
        );
        let blitter = FrameBlitter::new(&screen.device, screen.config.format);
        let frame_bind_group = texture.bind_group(&screen.device, blitter.bind_group_layout());

        Ok(Self {
            scene,
            state,
            camera_controller: CameraController::default(),
            blitter,
            texture,
            img_texture,
            frame_bind_group,
            dirty: false,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>, _app: &AppState, _screen: &mut Screen) {
        // The traced resolution stays fixed; the quad stretches to the window.
        tracing::debug!(width = new_size.width, height = new_size.height, "window resized");
    }

    fn process_event(&mut self, event: &Event<()>, _screen: &mut Screen) {
        if let Event::WindowEvent { event, .. } = event {
            if let Some(camera) = self
                .camera_controller
                .process_events(self.state.camera, event)
            {
                self.state = self.state.with_camera(camera);
                self.dirty = true;
            }
            if let WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(VirtualKeyCode::F5),
                        ..
                    },
                ..
            } = event
            {
                self.dirty = true;
            }
        }
    }

    fn update(&mut self, app: &AppState, screen: &mut Screen) -> Result<(), Self::LayerErr> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        let frame = render_frame(&self.state, &self.scene)?;
        frame.write_into(&mut self.img_texture);
        self.texture.update_data(&screen.queue, &self.img_texture);
        tracing::debug!(
            frame = app.frame(),
            since_last_update_ms = app.elapsed_time().as_millis() as u64,
            "texture updated"
        );
        Ok(())
    }

    fn render(&mut self, _app: &AppState, screen: &mut Screen) -> Result<(), wgpu::SurfaceError> {
        let output = screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let mut encoder = screen
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.blitter
            .draw(&mut encoder, &view, &self.frame_bind_group);

        screen.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn shutdown(&mut self, _app: &AppState, _screen: &mut Screen) -> Result<(), Self::LayerErr> {
        tracing::info!(position = ?self.state.camera.position, "exiting");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let scene = load_scene(cli.scene.as_deref())?;
    let state = cli.render_state();

    match cli.command {
        Command::Render { ref output } => {
            let frame = render_frame(&state, &scene)?;
            frame.save_png(output)?;
            tracing::info!(?output, "frame saved");
        }
        Command::View => {
            let settings = WindowSettings {
                title: "ray_tracing".to_owned(),
                width: state.width,
                height: state.height,
            };
            pollster::block_on(Application::<RayTracingCPU>::init(
                settings,
                ViewerConfig { scene, state },
            ))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1, -2,3.5").unwrap(), glam::Vec3::new(1.0, -2.0, 3.5));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ray_tracing", "render"]);
        let state = cli.render_state();
        assert_eq!(state, RenderState::default());
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "ray_tracing",
            "render",
            "--width",
            "32",
            "--position",
            "0,1,0",
            "-o",
            "out.png",
        ]);
        assert_eq!(cli.width, 32);
        assert_eq!(cli.position, glam::Vec3::Y);
        assert!(matches!(cli.command, Command::Render { ref output } if output == &PathBuf::from("out.png")));
    }
}
