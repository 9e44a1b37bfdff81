use crate::config::{self, Config};
use crate::screens::{ScreenAction, lottery};
use crate::store::{self, Records};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use log::{error, info};
use std::{error::Error, path::PathBuf, sync::Arc, time::Instant};

// the title is rebuilt at most this often
const TITLE_REFRESH_SECONDS: f32 = 0.25;

pub struct App {
    window: Option<Arc<Window>>,
    state: lottery::State,
    records_path: PathBuf,
    display_width: u32,
    display_height: u32,
    last_frame_time: Instant,
    last_title_update: Instant,
    last_title: String,
}

impl App {
    fn new(config: &Config, records: Records) -> Self {
        Self {
            window: None,
            state: lottery::init(records, config),
            records_path: PathBuf::from(&config.records_path),
            display_width: config.display_width,
            display_height: config.display_height,
            last_frame_time: Instant::now(),
            last_title_update: Instant::now(),
            last_title: String::new(),
        }
    }

    fn handle_action(&mut self, action: ScreenAction, event_loop: &ActiveEventLoop) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Save => self.save(),
            ScreenAction::Exit => {
                info!("Exit requested.");
                event_loop.exit();
            }
        }
    }

    fn save(&self) {
        let m = &self.state.machine;
        let records = Records::from_parts(m.roster(), m.board());
        match store::save(&self.records_path, &records) {
            Ok(()) => info!("Saved records to {:?}.", self.records_path),
            Err(e) => error!("Failed to save records to {:?}: {}", self.records_path, e),
        }
    }

    #[inline(always)]
    fn update_title(&mut self, window: &Window, now: Instant) {
        if now.duration_since(self.last_title_update).as_secs_f32() < TITLE_REFRESH_SECONDS {
            return;
        }
        self.last_title_update = now;
        let title = lottery::title(&self.state);
        if title != self.last_title {
            window.set_title(&title);
            self.last_title = title;
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        let window_attributes = Window::default_attributes()
            .with_title(config::WINDOW_TITLE)
            .with_resizable(true)
            .with_inner_size(PhysicalSize::new(self.display_width, self.display_height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        self.window = Some(window);
        self.last_frame_time = Instant::now();
        info!("Starting event loop...");
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref().cloned() else { return; };
        if window_id != window.id() { return; }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested. Shutting down.");
                self.handle_action(ScreenAction::Exit, event_loop);
            }
            WindowEvent::Resized(new_size) => {
                lottery::resize(&mut self.state, new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let action = lottery::handle_key_press(&mut self.state, &key_event);
                self.handle_action(action, event_loop);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                let action = lottery::update(&mut self.state, delta_time);
                self.handle_action(action, event_loop);
                self.update_title(&window, now);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.save();
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::get();
    let records = store::load(std::path::Path::new(&config.records_path))?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(&config, records);
    event_loop.run_app(&mut app)?;
    Ok(())
}
