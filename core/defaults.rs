use std::fs;
use std::path::Path;

/// Built-in ignore patterns applied before any user rules.
///
/// Covers VCS metadata, lock files, build outputs, caches, env files,
/// IDE/editor artifacts, OS files, logs, test output, binary/media
/// assets and dependency directories. The list order matters: user
/// patterns are appended after it, so a user negation can override any
/// entry here.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Version control metadata
    ".git/",
    ".hg/",
    ".svn/",
    ".bzr/",
    // The ignore file itself is read but never exported
    ".gitignore",
    // Dependency lock files
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "poetry.lock",
    "Pipfile.lock",
    "composer.lock",
    "Gemfile.lock",
    "Cargo.lock",
    "go.sum",
    // Compiled code and binaries
    "*.pyc",
    "__pycache__/",
    "*.class",
    "*.jar",
    "*.war",
    "*.ear",
    "*.o",
    "*.a",
    "*.so",
    "*.dylib",
    "*.dll",
    "*.exe",
    "*.wasm",
    "*.elc",
    // Build output directories
    "build/",
    "dist/",
    "target/",
    "bin/",
    "obj/",
    "out/",
    "public/build/",
    // Framework and tool caches
    ".next/",
    ".nuxt/",
    ".svelte-kit/",
    ".vercel/",
    ".serverless/",
    ".terraform/",
    // Environment files
    ".env",
    ".env.*",
    // Virtual environments
    ".venv/",
    "venv/",
    "env/",
    ".env/",
    // IDE and editor configuration
    ".idea/",
    ".vscode/",
    "*.sublime-*",
    ".project",
    ".settings/",
    ".classpath",
    "*.swp",
    "*.swo",
    // OS generated files
    ".DS_Store",
    "Thumbs.db",
    // Logs
    "*.log",
    // Test and coverage output
    "coverage/",
    ".coverage",
    "htmlcov/",
    "*.lcov",
    "nosetests.xml",
    "pytest.xml",
    ".pytest_cache/",
    // Media and other non-text assets
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.bmp",
    "*.tiff",
    "*.webp",
    "*.ico",
    "*.svg",
    "*.mp3",
    "*.wav",
    "*.ogg",
    "*.flac",
    "*.mp4",
    "*.avi",
    "*.mov",
    "*.wmv",
    "*.mkv",
    "*.webm",
    "*.pdf",
    "*.doc",
    "*.docx",
    "*.ppt",
    "*.pptx",
    "*.xls",
    "*.xlsx",
    "*.odt",
    "*.odp",
    "*.ods",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.rar",
    "*.7z",
    "*.tgz",
    "*.bz2",
    "*.iso",
    "*.dmg",
    "*.ttf",
    "*.otf",
    "*.woff",
    "*.woff2",
    // Dependency directories
    "node_modules/",
    "vendor/",
    "bower_components/",
    // Deployment artifacts
    "cdk.out/",
];

/// Reads ignore patterns from `ignore_file`, combining them with the
/// built-in defaults.
///
/// User patterns are appended after the defaults so they can override
/// them via negation. A missing or unreadable file is not an error:
/// the defaults are returned alone and a warning is logged.
pub fn read_ignore_lines(ignore_file: &Path) -> Vec<String> {
    let mut lines: Vec<String> = DEFAULT_IGNORE_PATTERNS
        .iter()
        .map(|s| (*s).to_string())
        .collect();

    if !ignore_file.exists() {
        log::info!(
            "No user ignore file found at {}. Using default ignore patterns only.",
            ignore_file.display()
        );
        return lines;
    }

    match fs::read_to_string(ignore_file) {
        Ok(content) => {
            let user_lines: Vec<String> = content
                .lines()
                .filter(|line| {
                    let trimmed = line.trim();
                    !trimmed.is_empty() && !trimmed.starts_with('#')
                })
                .map(|line| line.to_string())
                .collect();
            if user_lines.is_empty() {
                log::info!(
                    "User ignore file exists but is empty or only comments: {}",
                    ignore_file.display()
                );
            } else {
                log::info!(
                    "Read and appended {} patterns from user ignore file: {}",
                    user_lines.len(),
                    ignore_file.display()
                );
                lines.extend(user_lines);
            }
        }
        Err(e) => {
            log::warn!(
                "Could not read user ignore file {}: {}. Continuing with default ignore patterns only.",
                ignore_file.display(),
                e
            );
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn combines_defaults_with_user_patterns() {
        let dir = TempDir::new().unwrap();
        let ignore_path = dir.path().join(".gitignore");
        fs::write(&ignore_path, "# Comment\n*.tmp\n\nbuild/\n").unwrap();

        let lines = read_ignore_lines(&ignore_path);
        assert!(lines.contains(&".git/".to_string()));
        assert!(lines.contains(&".env".to_string()));
        assert!(lines.contains(&"node_modules/".to_string()));
        assert!(lines.contains(&"*.tmp".to_string()));
        assert!(lines.contains(&"build/".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with('#')));
    }

    #[test]
    fn user_patterns_come_after_defaults() {
        let dir = TempDir::new().unwrap();
        let ignore_path = dir.path().join(".gitignore");
        fs::write(&ignore_path, "!important.log\n").unwrap();

        let lines = read_ignore_lines(&ignore_path);
        let log_idx = lines.iter().position(|l| l == "*.log").unwrap();
        let neg_idx = lines.iter().position(|l| l == "!important.log").unwrap();
        assert!(neg_idx > log_idx);
    }

    #[test]
    fn missing_file_yields_defaults_only() {
        let dir = TempDir::new().unwrap();
        let lines = read_ignore_lines(&dir.path().join(".gitignore"));
        assert_eq!(lines.len(), DEFAULT_IGNORE_PATTERNS.len());
    }
}
