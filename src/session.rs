//! # Session
//!
//! State a host keeps between transpositions: the parameters last used in
//! each mode and the named sections of a song. The core functions never read
//! or write this; hosts load a session before calling them and save it after.
//!
//! Sessions are stored as YAML:
//!
//! ```yaml
//! last:
//!   chart:
//!     input: "C  G\nHello"
//!     request:
//!       origin: infer
//!       destination: D
//!       preference: sharp
//! sections:
//! - name: Verse
//!   chords: C G Am F
//!   transposed: D A Bm G
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::{transpose_chord_list, Mode, TranspositionRequest};
use crate::key::infer_from_chord_list;
use crate::TransposeError;

/// Parameters and input of the most recent transposition in one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastTransposition {
    pub input: String,
    pub request: TranspositionRequest,
}

/// A named part of a song (verse, chorus, bridge) holding a chord list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub chords: String,
    #[serde(default)]
    pub transposed: String,
}

impl Section {
    pub fn new(name: impl Into<String>, chords: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chords: chords.into(),
            transposed: String::new(),
        }
    }
}

/// Everything a host persists between runs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub last: BTreeMap<SessionMode, LastTransposition>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Keys under which last-used parameters are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    List,
    Chart,
    Sections,
}

impl From<Mode> for SessionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::ChordList => Self::List,
            Mode::Chart => Self::Chart,
        }
    }
}

impl Session {
    /// Decode a session from YAML text. Blank text is an empty session.
    pub fn from_yaml(source: &str) -> Result<Self, TransposeError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).map_err(|e| TransposeError::Session(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, TransposeError> {
        serde_yaml::to_string(self).map_err(|e| TransposeError::Session(e.to_string()))
    }

    /// Load a session file. A missing file is an empty session.
    pub fn load(path: &Path) -> Result<Self, TransposeError> {
        match fs::read_to_string(path) {
            Ok(source) => {
                let session = Self::from_yaml(&source)?;
                tracing::debug!(path = %path.display(), sections = session.sections.len(), "loaded session");
                Ok(session)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no session file yet, starting empty");
                Ok(Self::default())
            }
            Err(source) => Err(TransposeError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), TransposeError> {
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).map_err(|source| TransposeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "saved session");
        Ok(())
    }

    pub fn last(&self, mode: SessionMode) -> Option<&LastTransposition> {
        self.last.get(&mode)
    }

    /// Record the input and parameters of a successful transposition.
    pub fn remember(&mut self, mode: SessionMode, input: impl Into<String>, request: TranspositionRequest) {
        self.last.insert(
            mode,
            LastTransposition {
                input: input.into(),
                request,
            },
        );
    }

    pub fn add_section(&mut self, section: Section) -> usize {
        self.sections.push(section);
        self.sections.len() - 1
    }

    /// Remove a section by position, returning it if it existed.
    pub fn remove_section(&mut self, index: usize) -> Option<Section> {
        (index < self.sections.len()).then(|| self.sections.remove(index))
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Transpose every section with one shared request.
    ///
    /// An inferred origin is taken from the first chord across all sections
    /// in order, so every section moves by the same interval. Sections with
    /// blank chords get a blank result. On error no section is modified.
    pub fn transpose_sections(&mut self, request: &TranspositionRequest) -> Result<(), TransposeError> {
        if self.sections.iter().all(|s| s.chords.trim().is_empty()) {
            for section in &mut self.sections {
                section.transposed.clear();
            }
            self.remember(SessionMode::Sections, String::new(), *request);
            return Ok(());
        }

        let mut resolved = *request;
        if resolved.origin.known().is_none() {
            let first = self
                .sections
                .iter()
                .find_map(|s| infer_from_chord_list(&s.chords))
                .ok_or(TransposeError::OriginKeyNotIdentifiable)?;
            resolved.origin = first.into();
        }

        let mut results = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            let chords = section.chords.trim();
            results.push(if chords.is_empty() {
                String::new()
            } else {
                transpose_chord_list(chords, &resolved)?
            });
        }
        for (section, transposed) in self.sections.iter_mut().zip(results) {
            section.transposed = transposed;
        }

        tracing::info!(sections = self.sections.len(), "transposed all sections");
        self.remember(SessionMode::Sections, String::new(), *request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Origin;
    use crate::pitch::{EnharmonicPreference, PitchClass};
    use pretty_assertions::assert_eq;

    fn to_d(origin: Origin) -> TranspositionRequest {
        TranspositionRequest::new(origin, PitchClass::D, EnharmonicPreference::Sharp)
    }

    #[test]
    fn test_transpose_sections() {
        let mut session = Session::default();
        session.add_section(Section::new("Verse", "C G Am F"));
        session.add_section(Section::new("Empty", "   "));
        session.add_section(Section::new("Chorus", "  F  C/E Dm7 "));

        session.transpose_sections(&to_d(Origin::Known(PitchClass::C))).unwrap();

        assert_eq!(session.sections[0].transposed, "D A Bm G");
        assert_eq!(session.sections[1].transposed, "");
        assert_eq!(session.sections[2].transposed, "G  D/E Em7");
        assert!(session.last(SessionMode::Sections).is_some());
    }

    #[test]
    fn test_sections_share_one_inferred_origin() {
        let mut session = Session::default();
        session.add_section(Section::new("Intro", "G D"));
        session.add_section(Section::new("Verse", "C G"));

        session.transpose_sections(&to_d(Origin::Infer)).unwrap();

        assert_eq!(session.sections[0].transposed, "D A");
        assert_eq!(session.sections[1].transposed, "G D");
        assert_eq!(
            session.last(SessionMode::Sections).map(|l| l.request.origin),
            Some(Origin::Infer)
        );
    }

    #[test]
    fn test_blank_sections_still_remember_parameters() {
        let mut session = Session::default();
        session.add_section(Section::new("Tag", " "));
        let request = to_d(Origin::Known(PitchClass::C));

        session.transpose_sections(&request).unwrap();

        assert_eq!(session.sections[0].transposed, "");
        assert_eq!(session.last(SessionMode::Sections).map(|l| l.request), Some(request));
    }

    #[test]
    fn test_sections_inference_failure_leaves_sections_untouched() {
        let mut session = Session::default();
        session.add_section(Section {
            name: "Words".into(),
            chords: "la la".into(),
            transposed: "old".into(),
        });

        let err = session.transpose_sections(&to_d(Origin::Infer)).unwrap_err();
        assert!(matches!(err, TransposeError::OriginKeyNotIdentifiable));
        assert_eq!(session.sections[0].transposed, "old");
    }

    #[test]
    fn test_section_editing() {
        let mut session = Session::default();
        assert_eq!(session.add_section(Section::new("A", "C")), 0);
        assert_eq!(session.add_section(Section::new("B", "D")), 1);

        session.section_mut("B").unwrap().chords = "E".into();
        assert_eq!(session.sections[1].chords, "E");
        assert!(session.section_mut("Z").is_none());

        assert_eq!(session.remove_section(0).map(|s| s.name), Some("A".to_string()));
        assert_eq!(session.remove_section(5), None);
        assert_eq!(session.sections.len(), 1);
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut session = Session::default();
        session.remember(
            SessionMode::Chart,
            "C  G\nHello",
            TranspositionRequest::new(Origin::Infer, PitchClass::AS, EnharmonicPreference::Flat),
        );
        session.add_section(Section::new("Verse", "C G"));

        let yaml = session.to_yaml().unwrap();
        let decoded = Session::from_yaml(&yaml).unwrap();
        assert_eq!(decoded, session);
    }

    #[test]
    fn test_reads_hand_written_yaml() {
        let source = r#"
last:
  list:
    input: C G Am F
    request:
      origin: C
      destination: Eb
      preference: flat
sections:
- name: Verse
  chords: C G
"#;
        let session = Session::from_yaml(source).unwrap();
        let last = session.last(SessionMode::List).unwrap();
        assert_eq!(last.request.origin, Origin::Known(PitchClass::C));
        assert_eq!(last.request.destination, PitchClass::DS);
        assert_eq!(last.request.preference, EnharmonicPreference::Flat);
        assert_eq!(session.sections[0].transposed, "");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            Session::from_yaml("sections: 12"),
            Err(TransposeError::Session(_))
        ));
        assert_eq!(Session::from_yaml("").unwrap(), Session::default());
    }

    #[test]
    fn test_load_missing_file_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.yaml");

        let mut session = Session::load(&path).unwrap();
        assert_eq!(session, Session::default());

        session.add_section(Section::new("Bridge", "Em C"));
        session.save(&path).unwrap();

        let reloaded = Session::load(&path).unwrap();
        assert_eq!(reloaded.sections[0].name, "Bridge");
    }
}
