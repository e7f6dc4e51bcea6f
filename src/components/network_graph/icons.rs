//! OS icon lookup for host nodes.

const ASSET_DIR: &str = "/static/assets";

/// Icon drawn for a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OsIcon {
	/// `/static/assets/Linux.svg`
	Linux,
	/// `/static/assets/Windows.svg`
	Windows,
	/// Anything else
	Unknown,
}

impl OsIcon {
	/// Every icon, for preloading.
	pub const ALL: [OsIcon; 3] = [OsIcon::Linux, OsIcon::Windows, OsIcon::Unknown];

	/// Exact match on the reported OS name; anything else is `Unknown`.
	pub fn for_os(os: &str) -> Self {
		match os {
			"Linux" => OsIcon::Linux,
			"Windows" => OsIcon::Windows,
			_ => OsIcon::Unknown,
		}
	}

	/// Asset file stem.
	pub fn name(self) -> &'static str {
		match self {
			OsIcon::Linux => "Linux",
			OsIcon::Windows => "Windows",
			OsIcon::Unknown => "Unknown",
		}
	}

	/// Asset URL.
	pub fn path(self) -> String {
		format!("{ASSET_DIR}/{}.svg", self.name())
	}

	/// Fill used while the image is not loaded yet.
	pub fn fallback_color(self) -> &'static str {
		match self {
			OsIcon::Linux => "#f4b400",
			OsIcon::Windows => "#0078d4",
			OsIcon::Unknown => "#7f7f7f",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_known_os() {
		assert_eq!(OsIcon::for_os("Linux").path(), "/static/assets/Linux.svg");
		assert_eq!(OsIcon::for_os("Windows"), OsIcon::Windows);
	}

	#[test]
	fn test_unmapped_os_falls_back() {
		assert_eq!(OsIcon::for_os("macOS"), OsIcon::Unknown);
		assert_eq!(OsIcon::for_os(""), OsIcon::Unknown);
		assert_eq!(OsIcon::for_os("linux").path(), "/static/assets/Unknown.svg");
	}
}
