/// Application config enabling the runtime's developer mode, so assemblies
/// are resolved from `DEVPATH` instead of the installed locations.
pub fn developer_runtime_config() -> String {
    "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<configuration>\n  <runtime>\n    <developmentMode developerInstallation=\"true\"/>\n  </runtime>\n</configuration>\n"
        .to_string()
}

/// Runtime config file name for a given executable (`powershell.exe.config`).
pub fn runtime_config_name(executable: &str) -> String {
    format!("{executable}.config")
}
