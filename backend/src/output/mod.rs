//! Trajectory and particle output
//!
//! - [`TrajectoryOutput`]: terminal report of a replayed particle
//! - [`write_track_file`]: per-event track of a particle, as JSON

use crate::models::particle::TrackPoint;
use crate::models::Particle;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors writing diagnostic output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialization(String),
}

/// Receives the terminal state of a replayed particle
pub trait TrajectoryOutput {
    fn print_particle(&mut self, particle: &Particle) -> Result<(), OutputError>;
}

/// Human-readable particle report
///
/// # Example
/// ```
/// use particle_restart_core::output::{ConsoleReport, TrajectoryOutput};
/// use particle_restart_core::{Particle, ParticleType};
///
/// let p = Particle::new(7, ParticleType::Neutron, 1.0, 2.0e6, 0, [0.0; 3], [1.0, 0.0, 0.0]);
/// let mut report = ConsoleReport::new(Vec::new());
/// report.print_particle(&p).unwrap();
///
/// let text = String::from_utf8(report.into_inner()).unwrap();
/// assert!(text.contains("Particle 7"));
/// ```
pub struct ConsoleReport<W: Write> {
    writer: W,
    target: String,
}

impl ConsoleReport<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
            target: "stdout".to_string(),
        }
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            target: "report".to_string(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_report(&mut self, p: &Particle) -> io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, " ===========================================")?;
        writeln!(w, " Particle {}", p.id)?;
        writeln!(w, " ===========================================")?;
        writeln!(w, "  Type:            {}", p.particle_type)?;
        writeln!(w, "  Alive:           {}", p.alive)?;
        writeln!(w, "  Weight:          {:.6e}", p.weight)?;
        writeln!(w, "  Energy (eV):     {:.6e}", p.energy)?;
        writeln!(w, "  Energy group:    {}", p.group)?;
        writeln!(
            w,
            "  Position:        ({:.6e}, {:.6e}, {:.6e})",
            p.position[0], p.position[1], p.position[2]
        )?;
        writeln!(
            w,
            "  Direction:       ({:.6e}, {:.6e}, {:.6e})",
            p.direction[0], p.direction[1], p.direction[2]
        )?;
        writeln!(w, "  Events:          {}", p.n_event)?;
        writeln!(w, "  Collisions:      {}", p.n_collision)?;
        w.flush()
    }
}

impl<W: Write> TrajectoryOutput for ConsoleReport<W> {
    fn print_particle(&mut self, particle: &Particle) -> Result<(), OutputError> {
        self.write_report(particle).map_err(|source| OutputError::Io {
            path: self.target.clone(),
            source,
        })
    }
}

#[derive(Serialize)]
struct TrackFile<'a> {
    particle_id: u64,
    batch: u64,
    points: &'a [TrackPoint],
}

/// File name of the track of `particle_id` in `batch`
pub fn track_file_name(batch: u64, particle_id: u64) -> String {
    format!("track_{}_{}.json", batch, particle_id)
}

/// Write the recorded track of `particle` into `dir`
pub fn write_track_file(dir: &Path, batch: u64, particle: &Particle) -> Result<PathBuf, OutputError> {
    let path = dir.join(track_file_name(batch, particle.id));
    let io_error = |source| OutputError::Io {
        path: path.display().to_string(),
        source,
    };

    fs::create_dir_all(dir).map_err(io_error)?;
    let file = File::create(&path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);

    let track = TrackFile {
        particle_id: particle.id,
        batch,
        points: &particle.track,
    };
    serde_json::to_writer_pretty(&mut writer, &track)
        .map_err(|e| OutputError::Serialization(e.to_string()))?;
    writer.flush().map_err(io_error)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParticleType;

    #[test]
    fn test_report_lists_state() {
        let mut p = Particle::new(
            42,
            ParticleType::Photon,
            0.5,
            1.0e5,
            0,
            [1.0, 2.0, 3.0],
            [0.0, 1.0, 0.0],
        );
        p.alive = false;

        let mut report = ConsoleReport::new(Vec::new());
        report.print_particle(&p).unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();

        assert!(text.contains("Particle 42"));
        assert!(text.contains("photon"));
        assert!(text.contains("Alive:           false"));
        assert!(text.contains("5.000000e-1"));
    }

    #[test]
    fn test_track_file_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = Particle::new(3, ParticleType::Neutron, 1.0, 1.0, 0, [0.0; 3], [1.0, 0.0, 0.0]);
        p.write_track = true;
        p.record_track_point();
        p.advance(1.0);
        p.record_track_point();

        let path = write_track_file(dir.path(), 2, &p).unwrap();
        assert!(path.ends_with("track_2_3.json"));

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["particle_id"], 3);
        assert_eq!(value["points"].as_array().unwrap().len(), 2);
        assert_eq!(value["points"][1]["position"][0], 1.0);
    }
}
