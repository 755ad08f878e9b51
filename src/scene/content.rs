use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Section name to display prose. Built-in copy ships with the crate; the
/// host may replace it wholesale with a fetched `content.json`.
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(transparent)]
pub struct TextDictionary {
    entries: HashMap<String, String>,
}

impl TextDictionary {
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        let mut put = |key: &str, prose: &str| {
            entries.insert(key.to_string(), prose.to_string());
        };

        put(
            "Project",
            "Interactive 3D portfolio rendered in Rust and WebGL, with real-time \
             animation and click-to-inspect sections mapped onto orbiting planets.",
        );
        put(
            "Profile",
            "Software engineer focused on systems programming and real-time \
             graphics, with a background in Rust, WebAssembly and GPU pipelines.",
        );
        put(
            "Contact",
            "LinkedIn: linkedin.com/in/example\nGitHub: github.com/example\n\
             Email: hello@example.dev",
        );
        put(
            "AboutMe",
            "Computer science graduate who enjoys building interactive \
             visualizations and tooling. Comfortable across the stack, happiest \
             close to the renderer.",
        );
        put(
            "Skills",
            "Rust, WebAssembly, WebGL and shader programming. Solid grounding in \
             linear algebra, data structures and asynchronous programming. \
             Experienced with Git and agile delivery.",
        );
        put(
            "Achievements",
            "Shipped an open-source visualization library with an active \
             community. Conference speaker on browser-based 3D rendering. \
             Hackathon winner, twice.",
        );
        put(
            "Experience",
            "Built and operated production web applications and rendering \
             services. Led the migration of a visualization product to \
             WebAssembly, cutting frame times in half.",
        );
        put(
            "Education",
            "BSc in Computer Science. Coursework in computer graphics, compilers \
             and distributed systems.",
        );
        put(
            "Introduction",
            "Welcome! Click a planet to explore a section of this portfolio. \
             Drag to orbit the camera, scroll to zoom.",
        );

        TextDictionary { entries }
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::planets::PLANETS;

    #[test]
    fn lookup_known_section() {
        let dict = TextDictionary::builtin();
        assert!(dict.lookup("Skills").unwrap().contains("Rust"));
    }

    #[test]
    fn lookup_unknown_section() {
        let dict = TextDictionary::builtin();
        assert_eq!(dict.lookup("Blog"), None);
    }

    #[test]
    fn every_planet_has_prose() {
        let dict = TextDictionary::builtin();
        for spec in &PLANETS {
            assert!(dict.lookup(spec.name).is_some(), "missing prose for {}", spec.name);
        }
    }

    #[test]
    fn replacement_dictionary_stands_alone() {
        let mut entries = HashMap::new();
        entries.insert("Skills".to_string(), "replacement prose".to_string());
        let dict = TextDictionary { entries };
        assert_eq!(dict.lookup("Skills"), Some("replacement prose"));
        assert_eq!(dict.lookup("Profile"), None);
    }
}
