//! Full emulation runs, from configuration and candidate files to results

use trigger_emu::{input, output, scheduling, tally, Configuration};

use std::{fs, path::PathBuf, time::Duration};

const CANDIDATES: &str = "
# Fires Hlt1TwoTrackMVA through the 700+800 pair
candidate 2017
track PT=700 P=8000 TRCHI2DOF=1.1 BPVIPCHI2=12 TRGHOSTPROB=0.05 PX=500 PY=490
track PT=800 P=9000 TRCHI2DOF=1.3 BPVIPCHI2=15 TRGHOSTPROB=0.02 PX=-600 PY=529
combo SUMPT=1500.4 VDCHI2=30 VCHI2=2 BPVETA=3 BPVCORRM=3000 BPVDIRA=0.999 MVA=0.99
event VELO=1200 IT=400 OT=5000 TT=300
end

# Unknown year, nothing fires
candidate 2013
track PT=700 P=8000 TRCHI2DOF=1.1 BPVIPCHI2=12 TRGHOSTPROB=0.05 PX=500 PY=490
track PT=800 P=9000 TRCHI2DOF=1.3 BPVIPCHI2=15 TRGHOSTPROB=0.02 PX=-600 PY=529
combo SUMPT=1500 VDCHI2=30 VCHI2=2 BPVETA=3 BPVCORRM=3000 BPVDIRA=0.999 MVA=0.99
end

# The only combination does not belong to the track pair
candidate 2016
track PT=700 P=8000 TRCHI2DOF=1.1 BPVIPCHI2=12 TRGHOSTPROB=0.05 PX=500 PY=490
track PT=800 P=9000 TRCHI2DOF=1.3 BPVIPCHI2=15 TRGHOSTPROB=0.02 PX=-600 PY=529
combo SUMPT=2000 VDCHI2=30 VCHI2=2 BPVETA=3 BPVCORRM=3000 BPVDIRA=0.999 MVA=0.99
end
";

/// Scratch files of one test, removed when the test ends
struct Scratch {
    dir: PathBuf,
}
//
impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("trigger_emu-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}
//
impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

#[test]
fn config_to_results_file() {
    let scratch = Scratch::new("full");
    let candidates_path = scratch.path("candidates.txt");
    let output_path = scratch.path("decisions.txt");
    let config_path = scratch.path("emu.cfg");
    fs::write(&candidates_path, CANDIDATES).unwrap();
    fs::write(
        &config_path,
        format!(
            "{}    input\n{}    output\n1.    SUMPT tolerance\nno    track mask\n2    batch size\n",
            candidates_path.display(),
            output_path.display()
        ),
    )
    .unwrap();

    let cfg = Configuration::load(&config_path).unwrap();
    let candidates = input::read_candidates(&cfg.input).unwrap();
    assert_eq!(candidates.len(), 3);

    let summary = scheduling::run_emulation(&candidates, &cfg.settings(), cfg.batch_size);
    assert_eq!(summary.decisions[0].to_string(), "1\t0\t1\t1");
    assert_eq!(summary.decisions[1].to_string(), "0\t0\t-\t0");
    assert_eq!(summary.decisions[2].to_string(), "0\t0\t-\t0");
    let two_track = summary.efficiencies[tally::TWO_TRACK_MVA];
    assert_eq!((two_track.passed, two_track.total), (1, 3));
    let global = summary.efficiencies[tally::GLOBAL];
    assert_eq!((global.passed, global.total), (1, 1));

    output::dump_results(&cfg, &summary, Duration::from_millis(5)).unwrap();
    let results = fs::read_to_string(&output_path).unwrap();
    let tail: Vec<_> = results.lines().rev().take(3).collect();
    assert_eq!(tail, ["2\t0\t0\t-\t0", "1\t0\t0\t-\t0", "0\t1\t0\t1\t1"]);
}

#[test]
fn tolerance_comes_from_config() {
    let scratch = Scratch::new("tolerance");
    let config_path = scratch.path("emu.cfg");
    fs::write(&config_path, "in.txt\nout.txt\n0.1\nno\n10\n").unwrap();

    let cfg = Configuration::load(&config_path).unwrap();
    let candidates = input::parse_candidates(CANDIDATES).unwrap();
    let summary = scheduling::run_emulation(&candidates, &cfg.settings(), cfg.batch_size);

    // 1500.4 is 0.4 MeV away from the 700+800 pair
    assert!(!summary.decisions[0].two_track_mva);
}

#[test]
fn broken_candidate_file() {
    let err = input::parse_candidates("candidate 2017\ntrack PT=700\nend\n").unwrap_err();
    assert!(format!("{err:#}").contains("At line 2"), "{err:#}");
}

#[test]
fn demo_candidates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/candidates.txt");
    let candidates = input::read_candidates(path).unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1].track_mask, [true, false]);

    let cfg = Configuration::parse("demos/candidates.txt\nout.txt\n1.\nno\n1\n").unwrap();
    let summary = scheduling::run_emulation(&candidates, &cfg.settings(), cfg.batch_size);
    assert_eq!(summary.decisions[0].to_string(), "1\t1\t1\t1");
    assert_eq!(summary.decisions[1].to_string(), "0\t0\t0\t0");
}
