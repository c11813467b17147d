use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// An external program able to play one side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Agent {
    /// Base name of the executable, used in player names.
    pub name: String,
    /// Program to launch. A `.jar` path is run through `java -jar`.
    pub path_to_exe: PathBuf,
    /// Extra arguments given to the program.
    pub args: Vec<String>,
}

impl Agent {
    /// Agent launched without arguments.
    pub fn new(path_to_exe: impl Into<PathBuf>) -> Agent {
        Self::with_args(path_to_exe, vec![])
    }

    /// Agent launched with `args` after the executable.
    pub fn with_args(path_to_exe: impl Into<PathBuf>, args: Vec<String>) -> Agent {
        let path_to_exe = path_to_exe.into();
        Agent {
            name: base_name(&path_to_exe),
            path_to_exe,
            args,
        }
    }

    /// Program and arguments actually spawned for this agent.
    pub(crate) fn command_line(&self) -> (String, Vec<String>) {
        let path = self.path_to_exe.to_string_lossy().into_owned();
        let is_jar = self
            .path_to_exe
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));

        if is_jar {
            let mut args = vec!["-jar".to_string(), path];
            args.extend(self.args.iter().cloned());
            ("java".to_string(), args)
        } else {
            (path, self.args.clone())
        }
    }
}

impl Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
