use playback::{
    CpuPolicyTag, DirectionTag, DiskPolicyTag, ProcessEntry, Trace, Workload,
};

fn rr_workload() -> Workload {
    Workload::Cpu {
        policy:  CpuPolicyTag::RoundRobin,
        quantum: Some(2),
        processes: vec![
            ProcessEntry {
                id:         "P1".into(),
                arrival:    0,
                burst:      5,
                priority:   0,
            },
            ProcessEntry {
                id:         "P2".into(),
                arrival:    1,
                burst:      3,
                priority:   0,
            },
        ],
    }
}

#[test]
fn workloads_round_trip_through_json() {
    let workloads = vec![
        rr_workload(),
        Workload::Disk {
            policy:     DiskPolicyTag::CScan,
            direction:  DirectionTag::Down,
            head:       53,
            disk_size:  200,
            requests:   vec![98, 183, 37],
        },
    ];
    for w in workloads {
        let text = serde_json::to_string(&w).unwrap();
        let back: Workload = serde_json::from_str(&text).unwrap();
        assert_eq!(back, w);
    }
}

#[test]
fn direction_defaults_to_up() {
    let text = r#"{
        "family": "disk",
        "policy": "scan",
        "head": 53,
        "disk_size": 200,
        "requests": [98, 183, 37]
    }"#;
    let w: Workload = serde_json::from_str(text).unwrap();
    match w {
        Workload::Disk { direction, .. } => assert_eq!(direction, DirectionTag::Up),
        _ => panic!("parsed the wrong family"),
    }
}

#[test]
fn run_produces_a_complete_cpu_trace() {
    let Trace::Cpu(trace) = playback::run(&rr_workload()).unwrap() else {
        panic!("wrong trace family");
    };
    let order: Vec<&str> = trace.gantt.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec!["P1", "P2", "P1", "P2", "P1"]);
    assert_eq!(trace.stats.total_completion, 8);
}

#[test]
fn round_robin_without_quantum_is_refused() {
    let w = Workload::Cpu {
        policy:     CpuPolicyTag::RoundRobin,
        quantum:    None,
        processes:  vec![],
    };
    assert!(playback::run(&w).is_err());
}

#[test]
fn engine_rejections_surface_through_the_driver() {
    let w = Workload::Paging {
        policy: playback::PagePolicyTag::Fifo,
        frames: 0,
        refs:   vec![1, 2, 3],
    };
    let err = playback::run(&w).unwrap_err();
    assert!(err.to_string().contains("frame capacity"));
}
