/// Terminal viewing-conditions diagram
///
/// A top-down view of the screen, the centers of projection the content was
/// authored for, the viewer's actual eyes, and the hinge stimulus as authored
/// and as perceived.
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::Color,
    terminal,
};
use log::{debug, info};
use nalgebra::Point3;
use offaxis_core::{
    intersect_screen, DisplayConfig, GeometryError, ViewingConditions, ViewingMode,
};
use std::io::{self, stdout, Write};

pub mod renderer;

pub use renderer::DiagramRenderer;

const ANGLE_STEP: f32 = 5.0;
const DISTANCE_STEP: f32 = 1.0;
const SEPARATION_STEP: f32 = 0.25;

const HELP: &str = "a/d view angle  w/s view dist  j/l proj angle  i/k proj dist  [/] eye sep  -/= hinge  m mono/stereo  r reset  q quit";

/// Main application struct for the terminal diagram
pub struct TerminalApp {
    config: DisplayConfig,
    conditions: ViewingConditions,
    mode: ViewingMode,
    renderer: DiagramRenderer,
    message: Option<String>,
    running: bool,
}

impl TerminalApp {
    pub fn new(config: DisplayConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width as usize, height as usize))
    }

    pub fn with_size(config: DisplayConfig, width: usize, height: usize) -> Self {
        let basis = config.screen_basis();
        let mode = if config.stereo {
            ViewingMode::Stereoscopic
        } else {
            ViewingMode::Monoscopic
        };

        Self {
            conditions: ViewingConditions::new(basis),
            mode,
            renderer: DiagramRenderer::new(width, height, basis),
            message: None,
            running: true,
            config,
        }
    }

    pub fn conditions(&self) -> &ViewingConditions {
        &self.conditions
    }

    pub fn mode(&self) -> ViewingMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn renderer(&self) -> &DiagramRenderer {
        &self.renderer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            self.render()?;

            // Nothing moves on its own; redraw only after input.
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => self.handle_key(code),
                Event::Resize(width, height) => {
                    self.renderer.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let c = &mut self.conditions;
        let result = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                Ok(())
            }
            KeyCode::Char('a') | KeyCode::Left => c.set_viewing_angle(c.viewing_angle() - ANGLE_STEP),
            KeyCode::Char('d') | KeyCode::Right => c.set_viewing_angle(c.viewing_angle() + ANGLE_STEP),
            KeyCode::Char('w') | KeyCode::Up => {
                c.set_viewing_distance(c.viewing_distance() - DISTANCE_STEP)
            }
            KeyCode::Char('s') | KeyCode::Down => {
                c.set_viewing_distance(c.viewing_distance() + DISTANCE_STEP)
            }
            KeyCode::Char('j') => c.set_projection_angle(c.projection_angle() - ANGLE_STEP),
            KeyCode::Char('l') => c.set_projection_angle(c.projection_angle() + ANGLE_STEP),
            KeyCode::Char('i') => c.set_projection_distance(c.projection_distance() - DISTANCE_STEP),
            KeyCode::Char('k') => c.set_projection_distance(c.projection_distance() + DISTANCE_STEP),
            KeyCode::Char('[') => c.set_eye_separation(c.eye_separation() - SEPARATION_STEP),
            KeyCode::Char(']') => c.set_eye_separation(c.eye_separation() + SEPARATION_STEP),
            KeyCode::Char('-') => c.set_hinge_angle(c.hinge().angle - ANGLE_STEP),
            KeyCode::Char('=') | KeyCode::Char('+') => c.set_hinge_angle(c.hinge().angle + ANGLE_STEP),
            KeyCode::Char('m') => {
                self.mode = self.mode.toggled();
                Ok(())
            }
            KeyCode::Char('r') => {
                *c = ViewingConditions::new(self.config.screen_basis());
                Ok(())
            }
            _ => return,
        };
        self.record(result);
    }

    fn record(&mut self, result: Result<(), GeometryError>) {
        match result {
            Ok(()) => {
                debug!("viewing conditions now {:?} ({:?})", self.conditions, self.mode);
                self.message = None;
            }
            Err(err) => {
                info!("ignored input: {err}");
                self.message = Some(err.to_string());
            }
        }
    }

    /// Lay out the current frame in the renderer without touching the terminal.
    pub fn compose(&mut self) {
        compose_diagram(
            &mut self.renderer,
            &self.conditions,
            self.mode,
            self.message.as_deref(),
        );
    }

    fn render(&mut self) -> io::Result<()> {
        self.compose();

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Draw the screen, viewers, and authored/perceived hinge into `renderer`.
pub fn compose_diagram(
    renderer: &mut DiagramRenderer,
    conditions: &ViewingConditions,
    mode: ViewingMode,
    message: Option<&str>,
) {
    let basis = conditions.basis();
    let half_width = basis.half_extents().x;
    let screen_left = basis.local_to_world(-half_width, 0.0, 0.0);
    let screen_right = basis.local_to_world(half_width, 0.0, 0.0);
    let plane = basis.plane();

    let hinge = conditions.hinge_points();
    let perceived = conditions.perceived(mode);
    let summary = conditions.summary(mode);

    let (cops, eyes): (Vec<Point3<f32>>, Vec<Point3<f32>>) = match mode {
        ViewingMode::Monoscopic => (vec![conditions.cop()], vec![conditions.viewpoint()]),
        ViewingMode::Stereoscopic => {
            let cops = conditions.cop_pair();
            let eyes = conditions.eye_pair();
            (vec![cops.left, cops.right], vec![eyes.left, eyes.right])
        }
    };

    let mut extent = vec![screen_left, screen_right, conditions.object_origin()];
    extent.extend(cops.iter().chain(&eyes).chain(&hinge).chain(&perceived));

    renderer.clear();
    renderer.fit(&extent);

    renderer.arc(
        &basis.origin,
        conditions.viewing_distance(),
        -90.0,
        90.0,
        '.',
        Color::DarkCyan,
    );
    renderer.line(&screen_left, &screen_right, '=', Color::Grey);

    for cop in &cops {
        for p in &hinge {
            renderer.line(cop, p, '.', Color::DarkGrey);
        }
    }
    for eye in &eyes {
        for p in &perceived {
            renderer.line(eye, p, ':', Color::DarkYellow);
        }
    }
    for cop in &cops {
        for crossing in intersect_screen(cop, &plane, &hinge) {
            renderer.plot(&crossing, 'x', Color::Magenta);
        }
    }

    renderer.polyline(&hinge, '#', Color::White);
    renderer.polyline(&perceived, '*', Color::Yellow);

    for cop in &cops {
        renderer.plot(cop, 'C', Color::Magenta);
    }
    match eyes.as_slice() {
        [left, right] => {
            renderer.plot(left, 'L', Color::Red);
            renderer.plot(right, 'R', Color::Green);
        }
        others => {
            for eye in others {
                renderer.plot(eye, 'V', Color::Cyan);
            }
        }
    }

    let status = format!(
        "{:?} | view {:+.0}deg {:.1} | proj {:+.0}deg {:.1} | sep {:.2} | hinge {:.1}deg -> {:.1}deg",
        mode,
        conditions.viewing_angle(),
        conditions.viewing_distance(),
        conditions.projection_angle(),
        conditions.projection_distance(),
        conditions.eye_separation(),
        summary.true_angle,
        summary.perceived_angle,
    );
    renderer.text(0, 0, &status, Color::Yellow);
    if let Some(message) = message {
        renderer.text(0, 1, message, Color::Red);
    }
    let last_row = renderer.height().saturating_sub(1);
    renderer.text(0, last_row, HELP, Color::DarkGrey);
}
