//! Collision-safe names for exported items

use hits_case::EntityId;

/// Name under which a flagged file is saved at the top of its set folder.
///
/// `_<id>` goes before the last `.`, or at the end when the name has no
/// `.` or only a leading one.
///
/// ```
/// use hits_core::naming::suffixed_file_name;
///
/// assert_eq!(suffixed_file_name("report.txt", 5), "report_5.txt");
/// assert_eq!(suffixed_file_name(".bashrc", 3), ".bashrc_3");
/// assert_eq!(suffixed_file_name("README", 8), "README_8");
/// ```
pub fn suffixed_file_name(name: &str, id: EntityId) -> String {
    match name.rfind('.') {
        Some(pos) if pos != 0 => format!("{}_{}{}", &name[..pos], id, &name[pos..]),
        _ => format!("{name}_{id}"),
    }
}

/// Wrapper folder that keeps same-named flagged directories apart.
pub fn wrapper_dir_name(name: &str, id: EntityId) -> String {
    format!("{name}_{id}")
}
