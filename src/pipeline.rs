use std::io::Write;

use crate::{
    catalog::SceneRecord,
    config::Options,
    error::LandsatError,
    scene::SceneRepository,
    sink::start_sink_thread,
    worker::{process_record, Outcome},
};
use crossbeam_channel::{bounded, Receiver, Sender};

/// Totals for one run, reported once the result file is closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub queued: usize,
    pub written: usize,
}

/// Fans catalog records out to a pool of workers and funnels finished scene ids into one writer.
pub struct Pipeline<SR: SceneRepository> {
    repo: SR,
    opts: Options,
}

impl<SR: SceneRepository> Pipeline<SR> {
    pub fn new(repo: SR, opts: Options) -> Self {
        Self { repo, opts }
    }

    /// Process every record and write the id of each downloaded night scene to `out`.
    ///
    /// Returns after the workers have drained the queue and the sink has written its last line.
    pub fn run<I, W>(&self, records: I, out: W) -> Result<RunSummary, LandsatError>
    where
        I: IntoIterator<Item = SceneRecord>,
        W: Write + Send + 'static,
    {
        let num_workers = self.opts.workers.max(1);
        log::info!("Starting {} download workers", num_workers);

        let (to_workers, queue) = bounded(num_workers);
        let (to_sink, finished) = bounded(num_workers);

        let sink_thrd = start_sink_thread(finished, out)?;
        let pool = self.start_workers(num_workers, queue, to_sink);

        let mut queued = 0;
        for rec in records {
            to_workers
                .send(rec)
                .map_err(|_| LandsatError::Thread("all download workers have stopped".into()))?;
            queued += 1;
        }

        // Workers stop once the queue is closed and empty, taking their result senders with them.
        drop(to_workers);
        pool.join();

        if pool.panic_count() > 0 {
            log::error!("{} download workers panicked", pool.panic_count());
        }

        let written = sink_thrd
            .join()
            .map_err(|_| LandsatError::Thread("result sink panicked".into()))??;

        log::info!("Finished: {} records queued, {} scenes written", queued, written);
        Ok(RunSummary { queued, written })
    }

    fn start_workers(
        &self,
        num_workers: usize,
        queue: Receiver<SceneRecord>,
        to_sink: Sender<String>,
    ) -> threadpool::ThreadPool {
        let pool = threadpool::ThreadPool::with_name("Download Thread".to_owned(), num_workers);

        for _ in 0..num_workers {
            let repo = self.repo.clone();
            let opts = self.opts.clone();
            let queue = queue.clone();
            let to_sink = to_sink.clone();

            pool.execute(move || {
                for rec in queue {
                    if let Outcome::Downloaded(id) = process_record(&repo, &opts, &rec) {
                        if to_sink.send(id).is_err() {
                            log::error!("Result sink has stopped, abandoning worker");
                            return;
                        }
                    }
                }
            });
        }

        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        artifact::ArtifactKind,
        catalog::Catalog,
        config::{CacheSettings, DateWindow},
        http_scene::HttpRepository,
        remote::tests::MockRemote,
    };
    use chrono::naive::NaiveDateTime;
    use std::{collections::HashSet, fs, path::Path, sync::Arc};
    use tempfile::TempDir;

    const HEADER: &str = "entityId,acquisitionDate,cloudCover,processingLevel,path,row,\
                          min_lat,min_lon,max_lat,max_lon,download_url";

    fn base(id: &str) -> String {
        format!("http://archive.example.com/L8/{}/", id)
    }

    fn row(id: &str, time: &str, level: &str) -> String {
        format!("{},{},7.25,{},44,34,1.0,2.0,3.0,4.0,{}index.html", id, time, level, base(id))
    }

    fn serve_scene(remote: &MockRemote, id: &str, elevation: &str, bands: &[u8]) {
        let mtl = format!(
            "GROUP = IMAGE_ATTRIBUTES\n    SUN_ELEVATION = {}\nEND_GROUP\n",
            elevation
        );
        remote.insert(&ArtifactKind::Metadata.url(&base(id), id), mtl.as_bytes());
        remote.insert(&ArtifactKind::Quality.url(&base(id), id), b"qa");
        for &b in bands {
            let data = format!("band {}", b);
            remote.insert(&ArtifactKind::Band(b).url(&base(id), id), data.as_bytes());
        }
    }

    fn pipeline(
        tmp: &Path,
        remote: &Arc<MockRemote>,
        opts: Options,
    ) -> Pipeline<HttpRepository<MockRemote>> {
        let repo = HttpRepository::with_shared(
            Arc::clone(remote),
            CacheSettings {
                root: tmp.join("cache"),
                metadata: true,
                rasters: false,
            },
        );
        Pipeline::new(repo, opts)
    }

    fn opts(tmp: &Path, workers: i64) -> Options {
        Options {
            download_root: tmp.join("download"),
            bands: vec![10],
            quality: true,
            retries: 3,
            ..Options::default()
        }
        .with_workers(workers)
    }

    fn result_ids(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn night_scenes_end_up_in_result_file() {
        let tmp = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::new());
        serve_scene(&remote, "LC8DAY", "15.2", &[10]);
        serve_scene(&remote, "LC8NIGHT", "-3.7", &[10]);

        let csv = [
            HEADER.to_owned(),
            row("LC8DAY", "2016-06-01 18:00:00.000000", "L1T"),
            row("LC8NIGHT", "2016-06-01 05:00:00.000000", "L1GT"),
            row("LC8BAD", "2016-06-01 05:00:00.000000", "L2"),
        ]
        .join("\n");
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();

        let result = tmp.path().join("result.txt");
        let out = fs::File::create(&result).unwrap();
        let summary = pipeline(tmp.path(), &remote, opts(tmp.path(), 2))
            .run(catalog, out)
            .unwrap();

        assert_eq!(summary, RunSummary { queued: 3, written: 1 });
        assert_eq!(result_ids(&result), vec!["LC8NIGHT"]);

        let night = tmp.path().join("download/LC8NIGHT");
        assert_eq!(fs::read(night.join("LC8NIGHT_B10.TIF")).unwrap(), b"band 10");
        assert_eq!(fs::read(night.join("LC8NIGHT_BQA.TIF")).unwrap(), b"qa");
        assert!(night.join("LC8NIGHT_MTL.txt").exists());
        assert!(!tmp.path().join("download/LC8DAY").exists());
        assert!(!tmp.path().join("download/LC8BAD").exists());
    }

    #[test]
    fn every_success_written_exactly_once_under_load() {
        let tmp = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::new());

        let mut expected = HashSet::new();
        let mut records = vec![];
        for i in 0..60 {
            let id = format!("LC8{:04}", i);
            let night = i % 3 != 0;
            serve_scene(&remote, &id, if night { "-12.5" } else { "40.0" }, &[10]);
            if night {
                expected.insert(id.clone());
            }
            records.push(SceneRecord::new(vec![
                id.clone(),
                "2016-06-01 05:00:00.000000".to_owned(),
                "0".to_owned(),
                "L1T".to_owned(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                format!("{}index.html", base(&id)),
            ]));
        }

        let result = tmp.path().join("result.txt");
        let out = fs::File::create(&result).unwrap();
        let summary = pipeline(tmp.path(), &remote, opts(tmp.path(), 8))
            .run(records, out)
            .unwrap();

        let ids = result_ids(&result);
        assert_eq!(summary.written, expected.len());
        assert_eq!(ids.len(), expected.len());
        assert_eq!(ids.into_iter().collect::<HashSet<_>>(), expected);
    }

    #[test]
    fn out_of_window_records_are_silently_dropped() {
        let tmp = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::new());
        serve_scene(&remote, "LC8EARLY", "-3.7", &[10]);
        serve_scene(&remote, "LC8LATE", "-3.7", &[10]);
        serve_scene(&remote, "LC8IN", "-3.7", &[10]);

        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        let mut o = opts(tmp.path(), 1);
        o.window = DateWindow::new(
            Some(at("2016-01-01 00:00:00")),
            Some(at("2016-12-31 00:00:00")),
        )
        .unwrap();

        let csv = [
            HEADER.to_owned(),
            row("LC8EARLY", "2015-12-31 23:59:59.999999", "L1T"),
            row("LC8LATE", "2016-12-31 00:00:01.000000", "L1T"),
            row("LC8IN", "2016-07-01 03:00:00.000000", "L1T"),
        ]
        .join("\n");

        let result = tmp.path().join("result.txt");
        let out = fs::File::create(&result).unwrap();
        pipeline(tmp.path(), &remote, o)
            .run(Catalog::from_reader(csv.as_bytes()).unwrap(), out)
            .unwrap();

        assert_eq!(result_ids(&result), vec!["LC8IN"]);
        assert_eq!(
            remote.requests_for(&ArtifactKind::Metadata.url(&base("LC8EARLY"), "LC8EARLY")),
            0
        );
        assert_eq!(
            remote.requests_for(&ArtifactKind::Metadata.url(&base("LC8LATE"), "LC8LATE")),
            0
        );
    }

    #[test]
    fn partial_scene_is_not_reported() {
        let tmp = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::new());
        serve_scene(&remote, "LC8PART", "-3.7", &[]);

        let csv = [
            HEADER.to_owned(),
            row("LC8PART", "2016-06-01 05:00:00.000000", "L1T"),
        ]
        .join("\n");

        let result = tmp.path().join("result.txt");
        let out = fs::File::create(&result).unwrap();
        let summary = pipeline(tmp.path(), &remote, opts(tmp.path(), 0))
            .run(Catalog::from_reader(csv.as_bytes()).unwrap(), out)
            .unwrap();

        assert_eq!(summary.written, 0);
        assert!(result_ids(&result).is_empty());
        assert_eq!(
            remote.requests_for(&ArtifactKind::Band(10).url(&base("LC8PART"), "LC8PART")),
            3
        );
    }

    #[test]
    fn rerun_uses_cache_for_metadata() {
        let tmp = TempDir::new().unwrap();
        let remote = Arc::new(MockRemote::new());
        serve_scene(&remote, "LC8N", "-3.7", &[10]);
        let mtl_url = ArtifactKind::Metadata.url(&base("LC8N"), "LC8N");

        for _ in 0..2 {
            let csv = [
                HEADER.to_owned(),
                row("LC8N", "2016-06-01 05:00:00.000000", "L1T"),
            ]
            .join("\n");
            let out = fs::File::create(tmp.path().join("result.txt")).unwrap();
            pipeline(tmp.path(), &remote, opts(tmp.path(), 2))
                .run(Catalog::from_reader(csv.as_bytes()).unwrap(), out)
                .unwrap();
        }

        assert_eq!(remote.requests_for(&mtl_url), 1);
        assert_eq!(result_ids(&tmp.path().join("result.txt")), vec!["LC8N"]);
    }
}
