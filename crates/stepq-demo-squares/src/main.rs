#![forbid(unsafe_code)]

//! Recursive square subdivision animated in the terminal.
//!
//! Seeds one full-canvas call, then advances the queue a bounded number of
//! pops per tick. The expansion draws each square's outline into a shared
//! canvas and returns its four quadrants until squares reach the minimum
//! size. A [`FrameMonitor`] writes text snapshots of the canvas to disk as
//! the pattern grows; `--pop-mode`/`--add-mode`/`--shuffle` change the
//! growth order visibly.

mod canvas;
mod cli;

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use crossterm::{cursor, execute, terminal};
use tracing_subscriber::EnvFilter;

use canvas::Canvas;
use cli::Opts;
use stepq_core::{StepQueue, StepRng};
use stepq_monitor::{CaptureSink, FrameMonitor, FrameStamp};

/// Smallest square that still subdivides.
const MIN_SIZE: u16 = 4;

/// Outline glyphs by depth, reused cyclically past the deepest.
const DEPTH_GLYPHS: [char; 6] = ['█', '▓', '▒', '░', '+', '·'];

/// One pending subdivision: a square region and its depth.
#[derive(Debug, Clone, Copy)]
struct Square {
    x: u16,
    y: u16,
    size: u16,
    depth: usize,
}

impl Square {
    fn quadrants(self) -> [Square; 4] {
        let half = self.size / 2;
        let depth = self.depth + 1;
        [
            Square { x: self.x, y: self.y, size: half, depth },
            Square { x: self.x + half, y: self.y, size: half, depth },
            Square { x: self.x, y: self.y + half, size: half, depth },
            Square { x: self.x + half, y: self.y + half, size: half, depth },
        ]
    }
}

/// Writes numbered canvas snapshots under a directory.
struct TextFrameSink {
    dir: PathBuf,
    canvas: Rc<RefCell<Canvas>>,
    frame: u32,
}

impl CaptureSink for TextFrameSink {
    fn capture(&mut self, frame: &FrameStamp) {
        self.frame += 1;
        let path = self
            .dir
            .join(format!("{}-{:06}.txt", frame.file_stem(), self.frame));
        if let Err(err) = fs::write(&path, self.canvas.borrow().render()) {
            tracing::warn!(path = %path.display(), %err, "frame write failed");
        }
    }
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&opts) {
        eprintln!("stepq-demo-squares: {err}");
        std::process::exit(1);
    }
}

fn run(opts: &Opts) -> io::Result<()> {
    let size = opts.size.next_power_of_two();
    let canvas = Rc::new(RefCell::new(Canvas::new(size, size)));

    let paint = Rc::clone(&canvas);
    let expansion = move |call: &Square| -> Vec<Square> {
        let glyph = DEPTH_GLYPHS[call.depth % DEPTH_GLYPHS.len()];
        paint
            .borrow_mut()
            .draw_rect(call.x, call.y, call.size, glyph);
        if call.size / 2 < MIN_SIZE {
            return Vec::new();
        }
        call.quadrants().to_vec()
    };

    let rng = opts.seed.map_or_else(StepRng::from_entropy, StepRng::new);
    let mut queue = StepQueue::with_modes(opts.pop_mode, opts.add_mode)
        .with_rng(rng)
        .with_expansion(expansion)
        .with_calls([Square { x: 0, y: 0, size, depth: 0 }]);

    fs::create_dir_all(&opts.frames_dir)?;
    let sink = TextFrameSink {
        dir: PathBuf::from(&opts.frames_dir),
        canvas: Rc::clone(&canvas),
        frame: 0,
    };
    let mut monitor = match FrameMonitor::new(sink, opts.steps_per_frame) {
        Ok(monitor) => monitor,
        Err(err) => {
            eprintln!("stepq-demo-squares: {err}");
            std::process::exit(2);
        }
    };
    monitor.start();

    let slug = if opts.shuffle {
        format!("{}-shuffle", opts.slug)
    } else {
        opts.slug.clone()
    };

    let mut stdout = io::stdout();
    loop {
        let delta = queue.step_until(opts.steps_per_tick, 0);
        if opts.shuffle {
            queue.shuffle();
        }
        present(&mut stdout, &canvas.borrow(), &queue)?;
        let captured = monitor.check(&queue, &slug);
        tracing::debug!(pops = delta.pops, adds = delta.adds, captured, "tick");
        if queue.is_empty() && !monitor.is_running() {
            break;
        }
        thread::sleep(Duration::from_millis(opts.tick_ms));
    }
    Ok(())
}

fn present(
    stdout: &mut io::Stdout,
    canvas: &Canvas,
    queue: &StepQueue<Square>,
) -> io::Result<()> {
    execute!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    stdout.write_all(canvas.render().as_bytes())?;
    writeln!(stdout, "{queue}")?;
    stdout.flush()
}
