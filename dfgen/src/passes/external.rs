//! External package installation.
//!
//! Third-party artifacts that are not in the distribution repositories are
//! described in `externalPackages`. Every enabled entry goes through two
//! phases:
//!
//! 1. **Fetch**: the URL scheme decides how the artifact enters the image.
//!    `ftp://` is downloaded with `wget` (`ADD` cannot fetch FTP),
//!    `file://` is copied from the build context, anything else is `ADD`ed.
//!    All of them land in the temp area.
//! 2. **Unpack**: the file name suffix decides what happens next, by the
//!    first matching rule in [`UNPACK_RULES`].
//!
//! A `file://` entry with `direct` set is copied straight to its
//! destination and skips the unpack phase.
//!
//! The generated directives are stored in the entry's `cont`, which a
//! template emits with `{{#externalPackages}}{{{ cont }}}{{/externalPackages}}`.

use super::{Pass, PassContext};
use crate::config::{ExtPkg, ImageConfig};
use crate::error::DfgenError;

/// In-image staging directory for fetched artifacts.
pub const DEFAULT_TEMP_AREA: &str = "/tmp";

/// How an artifact is brought into the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod<'a> {
    /// `RUN wget` into the temp area
    Wget,
    /// `COPY` from the build context into the temp area
    LocalCopy { source: &'a str },
    /// `COPY` from the build context straight to the destination
    DirectCopy { source: &'a str },
    /// `ADD` into the temp area
    Add,
}

impl<'a> FetchMethod<'a> {
    pub fn select(url: &'a str, direct: bool) -> Self {
        if url.starts_with("ftp://") {
            FetchMethod::Wget
        } else if let Some(source) = url.strip_prefix("file://") {
            if direct {
                FetchMethod::DirectCopy { source }
            } else {
                FetchMethod::LocalCopy { source }
            }
        } else {
            FetchMethod::Add
        }
    }
}

/// What to do with a fetched artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackKind {
    /// Gzip tarball followed by a custom command
    ArchiveWithCommand,
    Rpm,
    Tar,
    Gzip,
    Zip,
    /// Versioned shared library, optionally with a symlink
    SharedObject,
    /// Anything else: copy and make executable. Needs a destinationPath,
    /// like a shared object, since the copy has no other target.
    Plain,
}

impl UnpackKind {
    fn describe(&self) -> &'static str {
        match self {
            UnpackKind::ArchiveWithCommand => "archive with command",
            UnpackKind::Rpm => "rpm",
            UnpackKind::Tar => "tar archive",
            UnpackKind::Gzip => "gzip archive",
            UnpackKind::Zip => "zip archive",
            UnpackKind::SharedObject => "shared object",
            UnpackKind::Plain => "file",
        }
    }
}

type UnpackPredicate = fn(&str, &ExtPkg) -> bool;

/// Unpack rules in priority order; the first match wins.
pub const UNPACK_RULES: &[(UnpackKind, UnpackPredicate)] = &[
    (UnpackKind::ArchiveWithCommand, is_gzip_with_command),
    (UnpackKind::Rpm, is_rpm),
    (UnpackKind::Tar, is_tar),
    (UnpackKind::Gzip, is_gzip_name),
    (UnpackKind::Zip, is_zip),
    (UnpackKind::SharedObject, is_shared_object_name),
    (UnpackKind::Plain, matches_anything),
];

impl UnpackKind {
    /// Classify a fetched file by [`UNPACK_RULES`].
    pub fn select(file_name: &str, pkg: &ExtPkg) -> Self {
        UNPACK_RULES
            .iter()
            .find(|(_, matches)| matches(file_name, pkg))
            .map(|(kind, _)| *kind)
            .unwrap_or(UnpackKind::Plain)
    }
}

fn is_gzip(name: &str) -> bool {
    name.ends_with(".tgz") || name.ends_with(".gz")
}

fn is_gzip_with_command(name: &str, pkg: &ExtPkg) -> bool {
    is_gzip(name) && run_command(pkg).is_some()
}

/// `runCommand`, unless blank.
fn run_command(pkg: &ExtPkg) -> Option<&str> {
    pkg.run_command.as_deref().filter(|c| !c.trim().is_empty())
}

fn is_gzip_name(name: &str, _: &ExtPkg) -> bool {
    is_gzip(name)
}

fn is_rpm(name: &str, _: &ExtPkg) -> bool {
    name.ends_with(".rpm")
}

fn is_tar(name: &str, _: &ExtPkg) -> bool {
    name.ends_with(".tar")
}

fn is_zip(name: &str, _: &ExtPkg) -> bool {
    name.ends_with(".zip")
}

fn is_shared_object_name(name: &str, _: &ExtPkg) -> bool {
    is_shared_object(name)
}

fn matches_anything(_: &str, _: &ExtPkg) -> bool {
    true
}

/// `.so` followed by a dotted numeric version: `libfoo.so.1`, `libfoo.so.1.2.3`.
pub fn is_shared_object(name: &str) -> bool {
    match name.rfind(".so") {
        Some(idx) => {
            let version = &name[idx + 3..];
            version.starts_with('.')
                && version.len() > 1
                && version.chars().all(|c| c.is_ascii_digit() || c == '.')
        }
        None => false,
    }
}

/// Last path segment of a URL or path.
pub fn basename(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Generates the directives for external packages.
pub struct Installer<'a> {
    temp_area: &'a str,
}

impl<'a> Installer<'a> {
    pub fn new(temp_area: &'a str) -> Self {
        Self { temp_area }
    }

    /// Directives for one entry, each ending in a newline.
    ///
    /// The caller is responsible for skipping disabled entries.
    pub fn directives(&self, pkg: &ExtPkg) -> Result<Vec<String>, DfgenError> {
        let url = pkg.url.as_deref().unwrap_or_default();
        let file_name = basename(url);
        let staged = format!("{}/{}", self.temp_area.trim_end_matches('/'), file_name);

        let mut directives = Vec::new();
        match FetchMethod::select(url, pkg.direct) {
            FetchMethod::Wget => directives.push(format!("RUN wget {} -O {}\n", url, staged)),
            FetchMethod::LocalCopy { source } => {
                directives.push(format!("COPY {} {}\n", source, staged))
            }
            FetchMethod::DirectCopy { source } => {
                let dest = require_destination(pkg, file_name, "direct copy")?;
                directives.push(format!("COPY {} {}\n", source, dest));
                return Ok(directives);
            }
            FetchMethod::Add => directives.push(format!("ADD {} {}\n", url, staged)),
        }

        let kind = UnpackKind::select(file_name, pkg);
        tracing::debug!(file = file_name, kind = kind.describe(), "Selected unpack rule");
        directives.extend(self.unpack(kind, pkg, file_name, &staged)?);
        Ok(directives)
    }

    fn unpack(
        &self,
        kind: UnpackKind,
        pkg: &ExtPkg,
        file_name: &str,
        staged: &str,
    ) -> Result<Vec<String>, DfgenError> {
        let dest = pkg.destination_path.as_deref();
        let directives = match kind {
            UnpackKind::ArchiveWithCommand => {
                let command = run_command(pkg).unwrap_or_default();
                vec![
                    format!("RUN tar -zxf {}\n", staged),
                    format!("RUN {}\n", command),
                ]
            }
            UnpackKind::Rpm => vec![format!("RUN rpm -ivh --force {}\n", staged)],
            UnpackKind::Tar => vec![match dest {
                Some(dest) => format!("RUN tar -xf {} -C {}\n", staged, dest),
                None => format!("RUN tar -xf {}\n", staged),
            }],
            UnpackKind::Gzip => vec![match dest {
                Some(dest) => format!("RUN tar -zxf {} -C {}\n", staged, dest),
                None => format!("RUN tar -zxf {}\n", staged),
            }],
            UnpackKind::Zip => vec![match dest {
                Some(dest) => format!("RUN unzip -o {} -d {}\n", staged, dest),
                None => format!("RUN unzip -o {}\n", staged),
            }],
            UnpackKind::SharedObject => {
                let dest = require_destination(pkg, file_name, kind.describe())?;
                let mut directives = vec![copy_executable(staged, dest, file_name)];
                if let Some(link) = pkg.link_name.as_deref() {
                    directives.push(format!("RUN cd {} && ln -s {} {}\n", dest, file_name, link));
                }
                directives
            }
            UnpackKind::Plain => {
                let dest = require_destination(pkg, file_name, kind.describe())?;
                vec![copy_executable(staged, dest, file_name)]
            }
        };
        Ok(directives)
    }
}

fn copy_executable(staged: &str, dest: &str, file_name: &str) -> String {
    format!(
        "RUN cp {} {} && chmod 755 {}/{}\n",
        staged,
        dest,
        dest.trim_end_matches('/'),
        file_name
    )
}

fn require_destination<'p>(
    pkg: &'p ExtPkg,
    file_name: &str,
    kind: &'static str,
) -> Result<&'p str, DfgenError> {
    pkg.destination_path
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| DfgenError::MissingPath {
            file: file_name.to_string(),
            kind,
        })
}

pub fn apply(config: &mut ImageConfig, ctx: &mut PassContext<'_>) -> Result<(), DfgenError> {
    let Some(entries) = config.external_packages.as_mut() else {
        ctx.warn(Pass::ExternalPackages, "No external packages to install");
        return Ok(());
    };

    let installer = Installer::new(ctx.temp_area);
    for (index, pkg) in entries.iter_mut().enumerate() {
        if pkg.clear_derived() {
            ctx.warn(
                Pass::ExternalPackages,
                format!("External package #{} sets cont, which is generated; ignoring it", index + 1),
            );
        }
        let Some(url) = pkg.url.as_deref().filter(|u| !u.is_empty()) else {
            ctx.warn(
                Pass::ExternalPackages,
                format!("External package #{} has no URL, skipping", index + 1),
            );
            continue;
        };
        if pkg.disabled {
            ctx.warn(
                Pass::ExternalPackages,
                format!("Skipping disabled external package {}", url),
            );
            continue;
        }

        let directives = installer.directives(pkg)?;
        pkg.cont = Some(directives.concat());
    }
    Ok(())
}
