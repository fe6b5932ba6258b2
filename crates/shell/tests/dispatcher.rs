/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

//! Dispatcher behavior against a scripted device: queue discipline, pager
//! and sub-prompt absorption, timeout and teardown semantics.

mod util;

use std::sync::Arc;
use std::time::Duration;

use olt_shell::prompt::PromptGrammar;
use olt_shell::{SessionState, ShellError, ShellMode, ShellSession};
use util::scripted_shell;

fn config_session(stream: util::ScriptedShell) -> ShellSession {
    ShellSession::over_stream(stream, PromptGrammar::new("MA5801"), ShellMode::Config, None)
}

#[tokio::test(start_paused = true)]
async fn commands_resolve_in_fifo_order() {
    let (stream, mut device) = scripted_shell();
    let session = Arc::new(config_session(stream));

    // The device answers every command after 100ms of think time.
    tokio::spawn(async move {
        while let Some(written) = device.next_write().await {
            let cmd = written.trim_end().to_string();
            tokio::time::sleep(Duration::from_millis(100)).await;
            device.send(&format!("{cmd}\r\nresult for {cmd}\r\nMA5801(config)# "));
        }
    });

    let start = tokio::time::Instant::now();
    let calls = (0..10).map(|i| {
        let session = session.clone();
        async move {
            let out = session
                .execute(&format!("display thing {i}"))
                .await
                .unwrap();
            (i, tokio::time::Instant::now(), out)
        }
    });
    let results = futures::future::join_all(calls).await;
    let elapsed = start.elapsed();

    // Strictly serialized: ~100ms response + 800ms settle per command. A
    // parallel dispatcher would finish in under a second of virtual time.
    assert!(elapsed >= Duration::from_millis(10 * 900), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(10 * 900 + 500), "{elapsed:?}");

    let mut previous = start;
    for (i, finished_at, out) in results {
        assert!(!out.timed_out);
        assert_eq!(out.text, format!("result for display thing {i}\n"));
        assert!(finished_at >= previous, "command {i} resolved out of order");
        previous = finished_at;
    }
}

#[tokio::test(start_paused = true)]
async fn pager_output_fully_absorbed() {
    let (stream, mut device) = scripted_shell();
    let session = config_session(stream);

    let lines: Vec<String> = (1..=300).map(|n| format!("line {n}")).collect();
    let chunks: Vec<String> = lines.chunks(22).map(|chunk| chunk.join("\r\n")).collect();

    let responder = tokio::spawn(async move {
        let written = device.next_write().await.unwrap();
        let cmd = written.trim_end().to_string();

        let total = chunks.len();
        for (i, chunk) in chunks.iter().enumerate() {
            let mut frame = String::new();
            if i == 0 {
                frame.push_str(&format!("{cmd}\r\n"));
            }
            frame.push_str(chunk);
            if i + 1 < total {
                frame.push_str("\r\n---- More ( Press 'Q' to break ) ----");
            } else {
                frame.push_str("\r\nMA5801(config)# ");
            }
            device.send(&frame);
            if i + 1 < total {
                // The dispatcher must answer every pager stop with a SPACE.
                assert_eq!(device.next_write().await.unwrap(), " ");
            }
        }
    });

    let start = tokio::time::Instant::now();
    let out = session.execute("display ont info 0 all").await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(!out.timed_out);
    assert!(!out.text.contains("More"));
    assert_eq!(
        out.text.lines().filter(|l| l.starts_with("line ")).count(),
        300
    );
    for n in [1, 22, 23, 299, 300] {
        assert!(out.text.contains(&format!("line {n}\n")), "missing line {n}");
    }
    responder.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn parameter_subprompt_answered_once() {
    let (stream, mut device) = scripted_shell();
    let session = config_session(stream);

    let responder = tokio::spawn(async move {
        let written = device.next_write().await.unwrap();
        let cmd = written.trim_end().to_string();
        device.send(&format!("{cmd}\r\npartial output {{ <cr>||<K> }}:"));
        // Exactly one newline answers the sub-prompt.
        assert_eq!(device.next_write().await.unwrap(), "\n");
        device.send("remaining output\r\nMA5801(config)# ");
    });

    let out = session.execute("display ont autofind 0").await.unwrap();
    assert!(!out.timed_out);
    assert!(out.text.contains("partial output"));
    assert!(out.text.contains("remaining output"));
    assert!(!out.text.contains("<cr>"));
    responder.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn timeout_delivers_partial_output() {
    let (stream, mut device) = scripted_shell();
    let session = config_session(stream);

    tokio::spawn(async move {
        let written = device.next_write().await.unwrap();
        let cmd = written.trim_end().to_string();
        device.send(&format!("{cmd}\r\npartial line\r\n"));
        // Go silent without hanging up.
        std::future::pending::<()>().await;
    });

    let start = tokio::time::Instant::now();
    let out = session.execute("display something slow").await.unwrap();
    let elapsed = start.elapsed();

    assert!(out.timed_out);
    assert!(out.text.contains("partial line"));
    assert!(elapsed >= Duration::from_secs(15), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(16), "{elapsed:?}");

    // The shell survives a timeout: the next command still runs.
    assert!(session.is_connected());
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_in_flight_and_queued() {
    let (stream, mut device) = scripted_shell();
    let session = Arc::new(config_session(stream));

    // A device that swallows keystrokes and never answers.
    tokio::spawn(async move {
        while device.next_write().await.is_some() {}
    });

    let in_flight = {
        let session = session.clone();
        tokio::spawn(async move { session.execute("display a").await })
    };
    let queued = {
        let session = session.clone();
        tokio::spawn(async move { session.execute("display b").await })
    };
    // Let both enqueue before tearing down.
    tokio::time::sleep(Duration::from_millis(10)).await;

    session.shutdown();

    assert_eq!(in_flight.await.unwrap(), Err(ShellError::Cancelled));
    assert_eq!(queued.await.unwrap(), Err(ShellError::Cancelled));

    let mut state = session.state_receiver();
    state
        .wait_for(|s| *s == SessionState::Closed)
        .await
        .unwrap();
    assert!(!session.is_connected());
}

#[tokio::test(start_paused = true)]
async fn disconnect_fails_commands() {
    let (stream, mut device) = scripted_shell();
    let session = config_session(stream);

    tokio::spawn(async move {
        // Hang up as soon as the first command arrives.
        let _ = device.next_write().await;
        drop(device);
    });

    let result = session.execute("display a").await;
    assert_eq!(result, Err(ShellError::Disconnected));

    let mut state = session.state_receiver();
    state
        .wait_for(|s| *s == SessionState::Closed)
        .await
        .unwrap();

    // Later submissions fail fast.
    assert_eq!(
        session.execute("display b").await,
        Err(ShellError::Disconnected)
    );
}

#[tokio::test(start_paused = true)]
async fn mode_transitions_issued_lazily() {
    let (stream, mut device) = scripted_shell();
    let session = config_session(stream);

    let responder = tokio::spawn(async move {
        assert_eq!(
            device.next_write().await.unwrap(),
            "interface gpon 0/1\n"
        );
        device.send("interface gpon 0/1\r\nMA5801(config-if-gpon-0/1)# ");

        assert_eq!(
            device.next_write().await.unwrap(),
            "display ont info 0 all\n"
        );
        device.send("display ont info 0 all\r\nont rows\r\nMA5801(config-if-gpon-0/1)# ");

        // Returning to config requires exactly one quit.
        assert_eq!(device.next_write().await.unwrap(), "quit\n");
        device.send("quit\r\nMA5801(config)# ");

        assert_eq!(device.next_write().await.unwrap(), "display vlan all\n");
        device.send("display vlan all\r\nvlan rows\r\nMA5801(config)# ");
    });

    let out = session
        .execute_in(
            ShellMode::Interface("0/1".to_string()),
            "display ont info 0 all",
        )
        .await
        .unwrap();
    assert_eq!(out.text, "ont rows\n");

    let out = session.execute("display vlan all").await.unwrap();
    assert_eq!(out.text, "vlan rows\n");

    responder.await.unwrap();
}
