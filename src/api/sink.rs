use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::{Deref, DerefMut};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult, DisplayError};
use crate::render::{CairoRenderer, Renderer};

use super::{Figure, OutputArtifact, POINTS_PER_INCH};

pub const DEFAULT_DPI: u32 = 300;

/// Something that can put a saved figure in front of a user.
pub trait DisplaySurface: Send {
    fn show(&mut self, artifact: &OutputArtifact) -> Result<(), DisplayError>;

    /// `false` for surfaces that never show anything.
    fn is_interactive(&self) -> bool {
        true
    }
}

/// Shows nothing; used on servers and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDisplay;

impl DisplaySurface for HeadlessDisplay {
    fn show(&mut self, _artifact: &OutputArtifact) -> Result<(), DisplayError> {
        Err(DisplayError::Unavailable("headless display".to_owned()))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Opens the artifact with an external viewer and returns without waiting
/// for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDisplay {
    program: String,
    args: Vec<String>,
}

impl CommandDisplay {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Platform image opener, if this session looks graphical.
    #[must_use]
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "macos") {
            return Some(Self::new("open"));
        }
        if cfg!(target_os = "windows") {
            return Some(Self::new("cmd").with_args(["/C", "start", ""]));
        }
        let graphical = ["DISPLAY", "WAYLAND_DISPLAY"]
            .iter()
            .any(|key| std::env::var_os(key).is_some_and(|value| !value.is_empty()));
        graphical.then(|| Self::new("xdg-open"))
    }
}

impl DisplaySurface for CommandDisplay {
    fn show(&mut self, artifact: &OutputArtifact) -> Result<(), DisplayError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&artifact.path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| DisplayError::Launch {
                program: self.program.clone(),
                source,
            })?;
        // Reap the viewer in the background so it never turns into a zombie.
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// How tool calls hand finished figures to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DisplayMode {
    /// Open the platform viewer when a graphical session is detected.
    #[default]
    Auto,
    Headless,
    Command { program: String },
}

impl DisplayMode {
    /// Parses `auto`, `headless` (or `none`/`off`); anything else names a
    /// viewer program.
    pub fn parse(value: &str) -> ChartResult<Self> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Err(ChartError::InvalidConfig("display mode must not be empty".to_owned())),
            "auto" => Ok(Self::Auto),
            "headless" | "none" | "off" => Ok(Self::Headless),
            _ => Ok(Self::Command {
                program: trimmed.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn into_surface(self) -> Box<dyn DisplaySurface> {
        match self {
            Self::Auto => match CommandDisplay::detect() {
                Some(viewer) => Box::new(viewer),
                None => Box::new(HeadlessDisplay),
            },
            Self::Headless => Box::new(HeadlessDisplay),
            Self::Command { program } => Box::new(CommandDisplay::new(program)),
        }
    }
}

/// Owns a renderer and finishes its surface on every exit path.
struct FinishOnDrop(CairoRenderer);

impl Deref for FinishOnDrop {
    type Target = CairoRenderer;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for FinishOnDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// Rasterizes figures to PNG and optionally shows them.
pub struct FigureSink {
    dpi: u32,
    display: Box<dyn DisplaySurface>,
}

impl std::fmt::Debug for FigureSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigureSink")
            .field("dpi", &self.dpi)
            .field("interactive", &self.display.is_interactive())
            .finish()
    }
}

impl FigureSink {
    #[must_use]
    pub fn new(dpi: u32, display: Box<dyn DisplaySurface>) -> Self {
        Self { dpi, display }
    }

    /// Writes `figure` as a PNG to the reserved `artifact` path. On failure
    /// the partially written file is removed.
    pub fn persist(&self, figure: &Figure, artifact: &OutputArtifact) -> ChartResult<()> {
        let result = self.write_png(figure, artifact);
        if result.is_err() {
            if let Err(err) = fs::remove_file(&artifact.path) {
                debug!(path = %artifact.path.display(), error = %err, "could not remove partial output");
            }
        }
        result
    }

    fn write_png(&self, figure: &Figure, artifact: &OutputArtifact) -> ChartResult<()> {
        let (width, height) = figure.size.pixels(self.dpi);
        let scale = f64::from(self.dpi) / POINTS_PER_INCH;
        let mut renderer = FinishOnDrop(CairoRenderer::with_scale(width, height, scale)?);
        renderer.render(&figure.frame)?;

        let file = File::create(&artifact.path).map_err(|err| {
            ChartError::Persistence(format!(
                "cannot open `{}` for writing: {err}",
                artifact.path.display()
            ))
        })?;
        let mut writer = BufWriter::new(file);
        renderer.write_png(&mut writer)?;
        writer.flush().map_err(|err| {
            ChartError::Persistence(format!("failed to flush `{}`: {err}", artifact.path.display()))
        })?;

        let stats = renderer.last_stats();
        debug!(
            path = %artifact.path.display(),
            width,
            height,
            dpi = self.dpi,
            circles = stats.circles_drawn,
            texts = stats.texts_drawn,
            "wrote png"
        );
        Ok(())
    }

    /// Hands the saved artifact to the display surface. Returns whether it
    /// was shown; failures are logged and never propagated.
    pub fn display(&mut self, artifact: &OutputArtifact) -> bool {
        if !self.display.is_interactive() {
            debug!(path = %artifact.path.display(), "display disabled, skipping viewer");
            return false;
        }
        match self.display.show(artifact) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %artifact.path.display(), error = %err, "could not display figure");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DisplayMode;

    #[test]
    fn parses_display_modes() {
        assert_eq!(DisplayMode::parse("AUTO").expect("auto"), DisplayMode::Auto);
        assert_eq!(DisplayMode::parse("off").expect("off"), DisplayMode::Headless);
        assert_eq!(
            DisplayMode::parse(" feh ").expect("command"),
            DisplayMode::Command {
                program: "feh".to_owned()
            }
        );
        assert!(DisplayMode::parse("  ").is_err());
    }
}
