//! The recognized container-parameter whitelist.
//!
//! Instance overrides are filtered against this closed set before they merge
//! over a resolved template; unrecognized keys never reach the combined
//! template but remain visible to expressions through the rendering context.
//!
//! Any change to this list is a compatibility-relevant interface change.
//! Version: 1 (matches the v2.x docker container module parameter set).

/// Recognized container-parameter names, covering networking, resource
/// limits, lifecycle, security, and identity options.
pub const CONTAINER_PARAMETERS: &[&str] = &[
    "api_version",
    "auto_remove",
    "blkio_weight",
    "cacert_path",
    "capabilities",
    "cert_path",
    "cleanup",
    "command",
    "cpu_period",
    "cpu_quota",
    "cpu_shares",
    "cpuset_cpus",
    "cpuset_mems",
    "detach",
    "devices",
    "dns_search_domains",
    "dns_servers",
    "docker_host",
    "entrypoint",
    "env",
    "env_file",
    "etc_hosts",
    "exposed_ports",
    "force_kill",
    "groups",
    "hostname",
    "ignore_image",
    "image",
    "interactive",
    "ipc_mode",
    "keep_volumes",
    "kernel_memory",
    "key_path",
    "kill_signal",
    "labels",
    "links",
    "log_driver",
    "log_options",
    "mac_address",
    "memory",
    "memory_reservation",
    "memory_swap",
    "memory_swappiness",
    "name",
    "network_mode",
    "networks",
    "oom_killer",
    "oom_score_adj",
    "paused",
    "pid_mode",
    "privileged",
    "published_ports",
    "pull",
    "purge_networks",
    "read_only",
    "recreate",
    "restart",
    "restart_policy",
    "restart_retries",
    "security_opts",
    "shm_size",
    "ssl_version",
    "state",
    "stop_signal",
    "stop_timeout",
    "sysctls",
    "timeout",
    "tls",
    "tls_hostname",
    "tls_verify",
    "tmpfs",
    "trust_image_content",
    "tty",
    "ulimits",
    "user",
    "uts",
    "volume_driver",
    "volumes",
    "volumes_from",
    "working_dir",
];

/// Returns whether `key` is a recognized container parameter.
#[must_use]
pub fn is_container_parameter(key: &str) -> bool {
    CONTAINER_PARAMETERS.binary_search(&key).is_ok()
}
