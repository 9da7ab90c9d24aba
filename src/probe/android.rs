//! MTP device addressing.
//!
//! gvfs exposes an MTP device twice: as a session path
//! `/run/user/<uid>/gvfs/mtp:host=<device>/...` and as `mtp://<device>/...`.
//! A live device answers identically under both; a stale mount does not.

/// Rewrite a gvfs session path into its `mtp://` URI.
///
/// Paths outside the current user's gvfs MTP tree are returned unchanged.
pub fn mtp_uri(path: &str, uid: u32) -> String {
    let prefix = format!("/run/user/{}/gvfs/mtp:host=", uid);
    match path.strip_prefix(&prefix) {
        Some(rest) => format!("mtp://{}", rest),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_session_path_to_uri() {
        assert_eq!(
            mtp_uri("/run/user/1000/gvfs/mtp:host=Google_Pixel_7/Internal shared storage/DCIM", 1000),
            "mtp://Google_Pixel_7/Internal shared storage/DCIM"
        );
    }

    #[test]
    fn other_users_paths_are_unchanged() {
        let path = "/run/user/1001/gvfs/mtp:host=Phone/DCIM";
        assert_eq!(mtp_uri(path, 1000), path);
    }

    #[test]
    fn non_gvfs_paths_are_unchanged() {
        assert_eq!(mtp_uri("/media/phone", 1000), "/media/phone");
    }
}
