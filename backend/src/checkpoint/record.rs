//! Checkpoint record: simulation context plus the particle's source site

use super::format::{self, FormatError};
use crate::core::SimulationContext;
use crate::energy::EnergyTreatment;
use crate::models::{Particle, ParticleType, RunMode, Vec3};
use crate::restart::RestartError;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Everything a particle restart file holds
///
/// Constructed only through [`CheckpointRecord::from_document`] (loading)
/// or [`CheckpointRecord::from_source_site`] (writing); both validate every
/// field before the record exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointRecord {
    pub context: SimulationContext,
    pub run_mode: RunMode,
    /// Positive particle identity
    pub particle_id: u64,
    pub particle_type: ParticleType,
    pub weight: f64,
    /// Energy in eV, or the group index in multigroup runs
    pub energy: f64,
    pub position: Vec3,
    pub direction: Vec3,
    /// SHA-256 of the canonical document
    pub digest: String,
}

impl CheckpointRecord {
    /// Extract a record from a parsed checkpoint document
    ///
    /// Structural problems are reported before the run-mode tag is
    /// interpreted, so a wholly malformed file is always a `FormatError`.
    pub fn from_document(document: &Value) -> Result<Self, RestartError> {
        format::check_attributes(document)?;
        let datasets = format::group(document, "datasets")?;

        let context = SimulationContext::new(
            format::read_u64(datasets, "current_batch")?,
            format::read_u64(datasets, "generations_per_batch")?,
            format::read_u64(datasets, "current_generation")?,
            format::read_u64(datasets, "n_particles")?,
        )?;
        let run_mode_tag = format::read_str(datasets, "run_mode")?;

        let particle_id = format::read_u64(datasets, "id")?;
        if particle_id == 0 {
            return Err(FormatError::InvalidValue {
                field: "id".to_string(),
                reason: "particle id must be positive".to_string(),
            }
            .into());
        }

        let type_tag = format::read_i64(datasets, "type")?;
        let particle_type =
            ParticleType::from_tag(type_tag).ok_or_else(|| FormatError::InvalidValue {
                field: "type".to_string(),
                reason: format!("unknown particle type {}", type_tag),
            })?;

        let weight = format::read_f64(datasets, "weight")?;
        let energy = format::read_f64(datasets, "energy")?;
        let position = format::read_vec3(datasets, "position")?;
        let direction = format::read_vec3(datasets, "direction")?;

        let run_mode: RunMode = run_mode_tag.parse()?;

        Ok(Self {
            context,
            run_mode,
            particle_id,
            particle_type,
            weight,
            energy,
            position,
            direction,
            digest: compute_document_digest(document),
        })
    }

    /// Record the birth site of `particle`, as a production run does when
    /// the particle turns out to be lost
    ///
    /// The particle may be anywhere in its history; only its
    /// [`SourceSite`](crate::models::SourceSite) is written. In multigroup
    /// runs the stored energy is the birth group index.
    pub fn from_source_site(
        context: SimulationContext,
        run_mode: RunMode,
        particle: &Particle,
        treatment: &EnergyTreatment,
    ) -> Self {
        let site = &particle.source_site;
        let energy = match treatment {
            EnergyTreatment::ContinuousEnergy => site.energy,
            EnergyTreatment::Multigroup(_) => site.group as f64,
        };

        let mut record = Self {
            context,
            run_mode,
            particle_id: particle.id,
            particle_type: particle.particle_type,
            weight: site.weight,
            energy,
            position: site.position,
            direction: site.direction,
            digest: String::new(),
        };
        record.digest = compute_document_digest(&record.to_document());
        record
    }

    /// Checkpoint document for this record
    pub fn to_document(&self) -> Value {
        json!({
            "attributes": {
                "filetype": format::FILETYPE,
                "version": format::VERSION,
            },
            "datasets": {
                "current_batch": self.context.current_batch(),
                "generations_per_batch": self.context.generations_per_batch(),
                "current_generation": self.context.current_generation(),
                "n_particles": self.context.n_particles(),
                "run_mode": self.run_mode.as_tag(),
                "id": self.particle_id,
                "type": self.particle_type.tag(),
                "weight": self.weight,
                "energy": self.energy,
                "position": self.position,
                "direction": self.direction,
            },
        })
    }
}

/// Compute deterministic SHA256 hash of a checkpoint document
///
/// Object keys are sorted recursively first so the hash does not depend on
/// member order in the file.
pub fn compute_document_digest(document: &Value) -> String {
    fn canonicalize(value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                Value::Object(
                    entries
                        .into_iter()
                        .map(|(k, v)| (k.clone(), canonicalize(v)))
                        .collect(),
                )
            }
            Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
            other => other.clone(),
        }
    }

    let canonical = canonicalize(document).to_string();

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Value {
        json!({
            "attributes": { "filetype": "particle restart", "version": [2, 0] },
            "datasets": {
                "current_batch": 3,
                "generations_per_batch": 1,
                "current_generation": 1,
                "n_particles": 1000,
                "run_mode": "eigenvalue",
                "id": 7,
                "type": 0,
                "weight": 1.0,
                "energy": 2.0e6,
                "position": [0.0, 1.0, 2.0],
                "direction": [1.0, 0.0, 0.0],
            }
        })
    }

    #[test]
    fn test_from_document_extracts_all_fields() {
        let record = CheckpointRecord::from_document(&sample_document()).unwrap();
        assert_eq!(record.context.current_batch(), 3);
        assert_eq!(record.context.n_particles(), 1000);
        assert_eq!(record.run_mode, RunMode::Eigenvalue);
        assert_eq!(record.particle_id, 7);
        assert_eq!(record.particle_type, ParticleType::Neutron);
        assert_eq!(record.energy, 2.0e6);
        assert_eq!(record.position, [0.0, 1.0, 2.0]);
        assert_eq!(record.digest.len(), 64);
    }

    #[test]
    fn test_zero_id_rejected() {
        let mut doc = sample_document();
        doc["datasets"]["id"] = json!(0);
        let err = CheckpointRecord::from_document(&doc).unwrap_err();
        assert!(matches!(
            err,
            RestartError::Format(FormatError::InvalidValue { ref field, .. }) if field == "id"
        ));
    }

    #[test]
    fn test_unknown_particle_type_rejected() {
        let mut doc = sample_document();
        doc["datasets"]["type"] = json!(9);
        assert!(matches!(
            CheckpointRecord::from_document(&doc),
            Err(RestartError::Format(FormatError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_format_error_takes_precedence_over_run_mode() {
        let mut doc = sample_document();
        doc["datasets"]["run_mode"] = json!("particle restart");
        doc["datasets"].as_object_mut().unwrap().remove("direction");
        assert!(matches!(
            CheckpointRecord::from_document(&doc),
            Err(RestartError::Format(FormatError::MissingField(ref f))) if f == "direction"
        ));
    }

    #[test]
    fn test_digest_ignores_member_order() {
        let a: Value = serde_json::from_str(r#"{"x": 1, "y": {"b": 2, "a": 3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y": {"a": 3, "b": 2}, "x": 1}"#).unwrap();
        assert_eq!(compute_document_digest(&a), compute_document_digest(&b));
    }

    #[test]
    fn test_source_site_digest_matches_reloaded_document() {
        let record = CheckpointRecord::from_document(&sample_document()).unwrap();
        let particle = Particle::new(
            record.particle_id,
            record.particle_type,
            record.weight,
            record.energy,
            0,
            record.position,
            record.direction,
        );
        let written = CheckpointRecord::from_source_site(
            record.context,
            record.run_mode,
            &particle,
            &EnergyTreatment::ContinuousEnergy,
        );
        let reloaded = CheckpointRecord::from_document(&written.to_document()).unwrap();
        assert_eq!(reloaded, written);
    }
}
