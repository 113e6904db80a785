use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use nalgebra::Point2;
use ndarray::Array2;
use ndarray_npy::{NpzReader, NpzWriter};
use tracing::info;

use crate::descriptor::Descriptor;
use crate::error::{GestureError, Result};
use crate::hand_landmarks::{Hand, NUM_LANDMARKS};

/// A named reference shape.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    descriptor: Descriptor,
}

impl Template {
    pub fn new(name: impl Into<String>, descriptor: Descriptor) -> Template {
        Template {
            name: name.into(),
            descriptor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

/// Ordered, non-empty set of templates. Order decides ties when matching.
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn new(templates: Vec<Template>) -> Result<TemplateLibrary> {
        if templates.is_empty() {
            return Err(GestureError::EmptyLibrary("<in-memory>".into()));
        }
        Ok(TemplateLibrary { templates })
    }

    /// Reads a template store: an `.npz` archive whose entries, in archive
    /// order, are named after their gesture. Each entry is either a 21x21
    /// descriptor or 21x2 pixel landmarks.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TemplateLibrary> {
        let path = path.as_ref();
        let store_error = |reason: String| GestureError::TemplateStore {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| store_error(e.to_string()))?;
        let mut npz = NpzReader::new(file).map_err(|e| store_error(e.to_string()))?;
        let entries = npz.names().map_err(|e| store_error(e.to_string()))?;

        let mut templates = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let name = entry.strip_suffix(".npy").unwrap_or(entry).to_string();
            let array: Array2<f64> = npz.by_index(index).map_err(|e| GestureError::InvalidTemplate {
                name: name.clone(),
                reason: e.to_string(),
            })?;

            let descriptor = template_descriptor(&name, array)?;
            templates.push(Template::new(name, descriptor));
        }

        if templates.is_empty() {
            return Err(GestureError::EmptyLibrary(path.display().to_string()));
        }

        info!(
            path = %path.display(),
            count = templates.len(),
            "loaded gesture templates"
        );

        Ok(TemplateLibrary { templates })
    }

    /// Writes the library in the format [`TemplateLibrary::load`] reads.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let store_error = |reason: String| GestureError::TemplateStore {
            path: path.to_path_buf(),
            reason,
        };

        // archive entries are keyed by name
        let mut seen = HashSet::new();
        if let Some(dup) = self.templates.iter().find(|t| !seen.insert(t.name())) {
            return Err(GestureError::InvalidTemplate {
                name: dup.name.clone(),
                reason: "duplicate template name".into(),
            });
        }

        let mut npz = NpzWriter::new(File::create(path)?);
        for template in &self.templates {
            npz.add_array(template.name.as_str(), template.descriptor.as_array())
                .map_err(|e| store_error(e.to_string()))?;
        }
        npz.finish().map_err(|e| store_error(e.to_string()))?;

        info!(path = %path.display(), count = self.templates.len(), "saved gesture templates");
        Ok(())
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Always false for a constructed library.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name()).collect()
    }
}

fn template_descriptor(name: &str, array: Array2<f64>) -> Result<Descriptor> {
    let invalid = |reason: String| GestureError::InvalidTemplate {
        name: name.to_string(),
        reason,
    };

    match array.dim() {
        (NUM_LANDMARKS, NUM_LANDMARKS) => {
            Descriptor::from_matrix(array).map_err(|e| invalid(e.to_string()))
        }
        (NUM_LANDMARKS, 2) => {
            let points = array
                .rows()
                .into_iter()
                .map(|row| Point2::new(row[0], row[1]))
                .collect();
            let hand = Hand::from_points(points).map_err(|e| invalid(e.to_string()))?;
            Descriptor::from_hand(&hand).map_err(|e| invalid(e.to_string()))
        }
        (rows, columns) => Err(invalid(format!(
            "expected {n}x{n} descriptor or {n}x2 landmarks, got {rows}x{columns}",
            n = NUM_LANDMARKS
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        let err = TemplateLibrary::new(Vec::new()).unwrap_err();
        assert!(matches!(err, GestureError::EmptyLibrary(_)));
    }

    #[test]
    fn test_landmark_entry_builds_descriptor() {
        let mut array = Array2::zeros((NUM_LANDMARKS, 2));
        array[[9, 0]] = 40.0;
        array[[8, 1]] = 80.0;

        let descriptor = template_descriptor("point", array).unwrap();
        assert_eq!(descriptor.get(0, 9), 1.0);
        assert_eq!(descriptor.get(0, 8), 2.0);
    }

    #[test]
    fn test_degenerate_landmark_entry_is_invalid() {
        let array = Array2::zeros((NUM_LANDMARKS, 2));
        let err = template_descriptor("flat", array).unwrap_err();
        assert!(matches!(err, GestureError::InvalidTemplate { ref name, .. } if name == "flat"));
    }

    #[test]
    fn test_wrong_shape_is_invalid() {
        let err = template_descriptor("odd", Array2::zeros((3, 3))).unwrap_err();
        assert!(matches!(err, GestureError::InvalidTemplate { .. }));
    }
}
