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

mod util;

use olt_shell::ShellMode;
use olt_shell::dialer;
use util::scripted_shell;

#[tokio::test(start_paused = true)]
async fn staircase_reaches_config_and_captures_vlans() {
    let (mut stream, mut device) = scripted_shell();

    let responder = tokio::spawn(async move {
        device.send("\r\nHuawei Integrated Access Software.\r\nMA5801> ");
        assert_eq!(device.next_write().await.unwrap(), "enable\n");
        device.send("enable\r\nMA5801# ");
        assert_eq!(device.next_write().await.unwrap(), "display vlan all\n");
        device.send("display vlan all\r\n 100 smart untag\r\n 200 smart tag\r\nMA5801# ");
        assert_eq!(device.next_write().await.unwrap(), "config\n");
        device.send("config\r\nMA5801(config)# ");
        // Keep the device alive until the dial completes.
        std::future::pending::<()>().await;
    });

    let dialed = dialer::dial(&mut stream).await.unwrap();
    assert_eq!(dialed.grammar.hostname(), "MA5801");
    assert_eq!(dialed.mode, ShellMode::Config);
    assert!(dialed.vlan_capture.contains("100 smart"));
    assert!(dialed.vlan_capture.contains("200 smart"));
    responder.abort();
}

#[tokio::test(start_paused = true)]
async fn already_privileged_prompt_skips_enable() {
    let (mut stream, mut device) = scripted_shell();

    let responder = tokio::spawn(async move {
        device.send("\r\nMA5801# ");
        // First keystrokes must be the vlan capture, not `enable`.
        assert_eq!(device.next_write().await.unwrap(), "display vlan all\n");
        device.send("display vlan all\r\n 100 smart untag\r\nMA5801# ");
        assert_eq!(device.next_write().await.unwrap(), "config\n");
        device.send("config\r\nMA5801(config)# ");
        std::future::pending::<()>().await;
    });

    let dialed = dialer::dial(&mut stream).await.unwrap();
    assert_eq!(dialed.mode, ShellMode::Config);
    responder.abort();
}
