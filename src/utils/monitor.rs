use std::time::Duration;

/// 某個階段結束時的行程資源快照
#[derive(Debug, Clone)]
pub struct StageStats {
    pub stage: String,
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
mod imp {
    use super::StageStats;
    use std::sync::Mutex;
    use std::time::Instant;
    use sysinfo::{Pid, ProcessesToUpdate, System};

    pub struct ResourceMonitor {
        state: Option<Mutex<MonitorState>>,
        start_time: Instant,
    }

    struct MonitorState {
        system: System,
        pid: Pid,
        peak_memory_mb: u64,
    }

    impl ResourceMonitor {
        pub fn new(enabled: bool) -> Self {
            let state = if enabled {
                match sysinfo::get_current_pid() {
                    Ok(pid) => {
                        let mut system = System::new();
                        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
                        Some(Mutex::new(MonitorState {
                            system,
                            pid,
                            peak_memory_mb: 0,
                        }))
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ Resource monitoring unavailable: {}", e);
                        None
                    }
                }
            } else {
                None
            };

            Self {
                state,
                start_time: Instant::now(),
            }
        }

        pub fn is_enabled(&self) -> bool {
            self.state.is_some()
        }

        /// 記錄目前階段的 CPU 與記憶體用量
        pub fn snapshot(&self, stage: &str) -> Option<StageStats> {
            let mut state = self.state.as_ref()?.lock().ok()?;
            let pid = state.pid;
            state
                .system
                .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

            let (cpu_usage, memory_mb) = {
                let process = state.system.process(pid)?;
                (process.cpu_usage(), process.memory() / 1024 / 1024)
            };
            state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);

            let stats = StageStats {
                stage: stage.to_string(),
                cpu_usage,
                memory_mb,
                peak_memory_mb: state.peak_memory_mb,
                elapsed: self.start_time.elapsed(),
            };

            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                stats.stage,
                stats.cpu_usage,
                stats.memory_mb,
                stats.peak_memory_mb,
                stats.elapsed
            );

            Some(stats)
        }
    }
}

// 非 CLI 建置時不收集資源資訊
#[cfg(not(feature = "cli"))]
mod imp {
    use super::StageStats;

    pub struct ResourceMonitor;

    impl ResourceMonitor {
        pub fn new(_enabled: bool) -> Self {
            Self
        }

        pub fn is_enabled(&self) -> bool {
            false
        }

        pub fn snapshot(&self, _stage: &str) -> Option<StageStats> {
            None
        }
    }
}

pub use imp::ResourceMonitor;

/// 最終摘要：總時間與記憶體峰值
pub fn log_summary(stages: &[StageStats]) {
    if let Some(last) = stages.last() {
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB, Stages: {}",
            last.elapsed,
            last.peak_memory_mb,
            stages.len()
        );
    }
}
