// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::workers::worker::Worker;
use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作管理器
///
/// 持有关闭信号的发送端，启动的每个工作器都订阅该信号。
/// 收到SIGINT后广播关闭并等待所有工作器自行退出，
/// 工作器在周期之间被信号打断，不会留下执行到一半的周期。
pub struct WorkerManager {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    /// 订阅关闭信号，传给新建的工作器
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// 启动一个工作器
    ///
    /// # 参数
    ///
    /// * `worker` - 要启动的工作器
    pub fn spawn<W>(&mut self, worker: W)
    where
        W: Worker + 'static,
    {
        let name = worker.name().to_string();
        let handle = tokio::spawn(async move {
            if let Err(e) = worker.run().await {
                error!("Worker {} exited with error: {}", name, e);
            }
        });
        self.handles.push(handle);
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号并优雅地关闭所有工作进程
    pub async fn wait_for_shutdown(mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
        self.shutdown().await;
    }

    /// 广播关闭信号并等待所有工作器退出
    pub async fn shutdown(&mut self) {
        info!("Shutting down workers...");
        let _ = self.shutdown_tx.send(true);

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Worker task join failed: {}", e);
            }
        }

        info!("Workers shut down successfully");
    }
}

impl Default for WorkerManager {
    fn default() -> Self {
        Self::new()
    }
}
