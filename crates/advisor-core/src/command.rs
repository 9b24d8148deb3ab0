//! Install command generation

use crate::report::DependencyKind;

/// Package manager binary named in generated commands
pub const PACKAGE_MANAGER: &str = "npm";

/// Build the install command for moving `package` to `available`
///
/// Dev dependencies get `--save-dev` so the package stays in the
/// `devDependencies` section of `package.json`.
pub fn update_command(package: &str, available: &str, kind: DependencyKind) -> String {
    let mut command = format!("{} install {}@{}", PACKAGE_MANAGER, package, available);
    if kind == DependencyKind::DevDependency {
        command.push_str(" --save-dev");
    }
    command
}
