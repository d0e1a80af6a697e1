use crate::error::InstallerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsKind {
    Windows,
    Darwin,
    Linux,
    FreeBsd,
    OpenBsd,
}

impl OsKind {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "win32" | "windows" | "cygwin" | "mingw" | "msys" => Some(Self::Windows),
            "darwin" | "macos" | "osx" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            "freebsd" => Some(Self::FreeBsd),
            "openbsd" => Some(Self::OpenBsd),
            _ => None,
        }
    }

    /// Lowercase name used for bundled directories and platform packages.
    pub fn package_name(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::FreeBsd => "freebsd",
            Self::OpenBsd => "openbsd",
        }
    }

    /// Capitalized name used in published release asset names.
    pub fn release_name(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Darwin => "MacOS",
            Self::Linux => "Linux",
            Self::FreeBsd => "Freebsd",
            Self::OpenBsd => "Openbsd",
        }
    }

    pub fn executable_extension(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchKind {
    Amd64,
    Arm64,
    X86,
}

impl ArchKind {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Some(Self::Amd64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            "ia32" | "x32" | "x86" | "i386" | "i686" | "386" => Some(Self::X86),
            _ => None,
        }
    }

    pub fn package_name(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::X86 => "386",
        }
    }

    pub fn release_name(self) -> &'static str {
        match self {
            Self::Amd64 => "x86_64",
            Self::Arm64 => "arm64",
            Self::X86 => "i386",
        }
    }
}

/// The resolved host platform, carrying both artifact naming dialects.
///
/// Values only come out of [`resolve_platform`], so an unsupported pair never
/// exists as a `PlatformTarget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformTarget {
    os: OsKind,
    arch: ArchKind,
}

impl PlatformTarget {
    pub fn os(&self) -> OsKind {
        self.os
    }

    pub fn arch(&self) -> ArchKind {
        self.arch
    }

    /// Package-style OS name, e.g. `darwin`.
    pub fn package_os(&self) -> &'static str {
        self.os.package_name()
    }

    /// Package-style architecture name, e.g. `amd64`.
    pub fn package_arch(&self) -> &'static str {
        self.arch.package_name()
    }

    /// Release-style OS name, e.g. `MacOS`.
    pub fn release_os(&self) -> &'static str {
        self.os.release_name()
    }

    /// Release-style architecture name, e.g. `x86_64`.
    pub fn release_arch(&self) -> &'static str {
        self.arch.release_name()
    }

    pub fn executable_extension(&self) -> &'static str {
        self.os.executable_extension()
    }

    pub fn executable_name(&self, product: &str) -> String {
        format!("{product}{}", self.executable_extension())
    }

    /// Fails for targets that have no separately published artifact.
    ///
    /// Only bundled tarballs ship a 32-bit Windows build.
    pub fn ensure_published_artifact(&self) -> Result<(), InstallerError> {
        if self.os == OsKind::Windows && self.arch == ArchKind::X86 {
            return Err(InstallerError::unsupported_arch(
                self.arch.package_name(),
                "no published artifact for 32-bit windows; a 64-bit CPU (amd64 or arm64) is required",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.package_os(), self.package_arch())
    }
}

pub fn resolve_platform(os: &str, arch: &str) -> Result<PlatformTarget, InstallerError> {
    let os_kind = OsKind::parse(os).ok_or_else(|| InstallerError::UnsupportedPlatform {
        os: os.to_string(),
    })?;
    let arch_kind = ArchKind::parse(arch).ok_or_else(|| {
        InstallerError::unsupported_arch(arch, "supported: x64/amd64, arm64, ia32/386")
    })?;

    Ok(PlatformTarget {
        os: os_kind,
        arch: arch_kind,
    })
}
