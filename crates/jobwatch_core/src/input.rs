use std::fmt;

/// Extensions accepted by every input group, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "xlsx"];

/// The three named input groups, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputGroup {
    Primary,
    Secondary,
    Format,
}

impl InputGroup {
    pub const ALL: [InputGroup; 3] = [InputGroup::Primary, InputGroup::Secondary, InputGroup::Format];

    pub fn name(self) -> &'static str {
        match self {
            InputGroup::Primary => "primary",
            InputGroup::Secondary => "secondary",
            InputGroup::Format => "format",
        }
    }

    /// Label shown next to the group's picker.
    pub fn label(self) -> &'static str {
        match self {
            InputGroup::Primary => "Primary sample files",
            InputGroup::Secondary => "Secondary sample files",
            InputGroup::Format => "Format file",
        }
    }

    pub fn allows_multiple(self) -> bool {
        !matches!(self, InputGroup::Format)
    }
}

impl fmt::Display for InputGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A file picked by the user. The payload is carried but never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub payload: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("{group} accepts a single file, got {count}")]
    TooManyFiles { group: InputGroup, count: usize },
    #[error("unsupported file type: {name} (accepted: .jpg, .jpeg, .png, .xlsx)")]
    UnsupportedExtension { name: String },
}

/// The current selection for all three groups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputSets {
    primary: Vec<SelectedFile>,
    secondary: Vec<SelectedFile>,
    format: Vec<SelectedFile>,
}

impl InputSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self, group: InputGroup) -> &[SelectedFile] {
        match group {
            InputGroup::Primary => &self.primary,
            InputGroup::Secondary => &self.secondary,
            InputGroup::Format => &self.format,
        }
    }

    /// Replaces the whole selection of `group`. A rejected selection leaves
    /// the previous one untouched.
    pub fn replace(
        &mut self,
        group: InputGroup,
        files: Vec<SelectedFile>,
    ) -> Result<(), SelectionError> {
        validate_selection(group, &files)?;
        let slot = match group {
            InputGroup::Primary => &mut self.primary,
            InputGroup::Secondary => &mut self.secondary,
            InputGroup::Format => &mut self.format,
        };
        *slot = files;
        Ok(())
    }
}

fn validate_selection(group: InputGroup, files: &[SelectedFile]) -> Result<(), SelectionError> {
    if !group.allows_multiple() && files.len() > 1 {
        return Err(SelectionError::TooManyFiles {
            group,
            count: files.len(),
        });
    }
    match files.iter().find(|file| !has_accepted_extension(&file.name)) {
        Some(file) => Err(SelectionError::UnsupportedExtension {
            name: file.name.clone(),
        }),
        None => Ok(()),
    }
}

pub fn has_accepted_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::new(name, Vec::new())
    }

    #[test]
    fn extensions_are_matched_case_insensitively() {
        assert!(has_accepted_extension("scan.JPG"));
        assert!(has_accepted_extension("sheet.xlsx"));
        assert!(has_accepted_extension("a.b.jpeg"));
        assert!(!has_accepted_extension("notes.txt"));
        assert!(!has_accepted_extension("xlsx"));
    }

    #[test]
    fn format_group_rejects_more_than_one_file() {
        let mut inputs = InputSets::new();
        let err = inputs
            .replace(InputGroup::Format, vec![file("a.xlsx"), file("b.xlsx")])
            .unwrap_err();

        assert_eq!(
            err,
            SelectionError::TooManyFiles {
                group: InputGroup::Format,
                count: 2
            }
        );
        assert!(inputs.files(InputGroup::Format).is_empty());
    }

    #[test]
    fn rejected_selection_keeps_previous_files() {
        let mut inputs = InputSets::new();
        inputs
            .replace(InputGroup::Primary, vec![file("one.png")])
            .unwrap();

        let result = inputs.replace(InputGroup::Primary, vec![file("two.png"), file("x.pdf")]);

        assert!(result.is_err());
        assert_eq!(inputs.files(InputGroup::Primary), &[file("one.png")]);
    }

    #[test]
    fn replacement_is_wholesale() {
        let mut inputs = InputSets::new();
        inputs
            .replace(InputGroup::Secondary, vec![file("a.png"), file("b.png")])
            .unwrap();
        inputs
            .replace(InputGroup::Secondary, vec![file("c.jpg")])
            .unwrap();

        assert_eq!(inputs.files(InputGroup::Secondary), &[file("c.jpg")]);
    }
}
