//! In-memory gateway used by the integration tests.
//!
//! Implements enough of the WebHDFS semantics (status codes, boolean
//! payloads, rename-into-directory) to exercise the client end to end, and
//! records every request it receives.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use webhdfs::api::Op;
use webhdfs::{FileType, Method, OperationRequest, RawResponse, Transport};

/// A request as seen by the gateway.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub op: Op,
    pub params: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    kind: FileType,
    data: Vec<u8>,
    permission: String,
    owner: String,
    group: String,
    mtime: i64,
    atime: i64,
    symlink: Option<String>,
}

impl Entry {
    fn dir(permission: &str) -> Self {
        Entry {
            kind: FileType::Directory,
            data: Vec::new(),
            permission: permission.to_string(),
            owner: "alice".to_string(),
            group: "supergroup".to_string(),
            mtime: 1_000,
            atime: 0,
            symlink: None,
        }
    }

    fn file(data: Vec<u8>, permission: &str) -> Self {
        Entry {
            kind: FileType::File,
            data,
            permission: permission.to_string(),
            owner: "alice".to_string(),
            group: "supergroup".to_string(),
            mtime: 1_000,
            atime: 1_000,
            symlink: None,
        }
    }
}

struct State {
    home: String,
    entries: BTreeMap<String, Entry>,
    requests: Vec<Recorded>,
    injected: VecDeque<RawResponse>,
}

#[derive(Clone)]
pub struct FakeGateway {
    state: Arc<Mutex<State>>,
}

impl FakeGateway {
    /// Gateway whose home directory (and its parents) already exist.
    pub fn new(home: &str) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("/".to_string(), Entry::dir("755"));
        let mut current = String::new();
        for segment in home.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            entries.insert(current.clone(), Entry::dir("755"));
        }
        FakeGateway {
            state: Arc::new(Mutex::new(State {
                home: home.to_string(),
                entries,
                requests: Vec::new(),
                injected: VecDeque::new(),
            })),
        }
    }

    /// Every request received so far, connect-time request included.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Answer the next request with `response` instead of the fake filesystem.
    pub fn inject(&self, response: RawResponse) {
        self.state.lock().unwrap().injected.push_back(response);
    }

    pub fn add_file(&self, path: &str, data: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .entries
            .insert(path.to_string(), Entry::file(data.to_vec(), "644"));
    }

    pub fn add_dir(&self, path: &str) {
        self.state
            .lock()
            .unwrap()
            .entries
            .insert(path.to_string(), Entry::dir("755"));
    }

    pub fn exists(&self, path: &str) -> bool {
        self.state.lock().unwrap().entries.contains_key(path)
    }

    pub fn content(&self, path: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .entries
            .get(path)
            .map(|e| e.data.clone())
    }

    pub fn owner_group(&self, path: &str) -> Option<(String, String)> {
        self.state
            .lock()
            .unwrap()
            .entries
            .get(path)
            .map(|e| (e.owner.clone(), e.group.clone()))
    }

    pub fn permission(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .entries
            .get(path)
            .map(|e| e.permission.clone())
    }

    pub fn times(&self, path: &str) -> Option<(i64, i64)> {
        self.state
            .lock()
            .unwrap()
            .entries
            .get(path)
            .map(|e| (e.mtime, e.atime))
    }
}

impl Transport for FakeGateway {
    fn execute(&self, request: OperationRequest) -> webhdfs::Result<RawResponse> {
        let recorded = Recorded {
            method: request.method,
            path: request.path.to_string(),
            op: request.op,
            params: request
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: request.body.into_bytes()?,
        };

        let mut state = self.state.lock().unwrap();
        state.requests.push(recorded.clone());
        if let Some(response) = state.injected.pop_front() {
            return Ok(response);
        }
        Ok(state.handle(&recorded))
    }
}

fn remote_exception(status: u16, exception: &str, message: &str) -> RawResponse {
    RawResponse::json(
        status,
        &json!({"RemoteException": {
            "exception": exception,
            "javaClassName": format!("java.io.{}", exception),
            "message": message
        }}),
    )
}

fn not_found(path: &str) -> RawResponse {
    remote_exception(404, "FileNotFoundException", &format!("File does not exist: {}", path))
}

fn ok_empty() -> RawResponse {
    RawResponse::from_bytes(200, None, Vec::new())
}

fn boolean(value: bool) -> RawResponse {
    RawResponse::json(200, &json!({ "boolean": value }))
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn child_prefix(path: &str) -> String {
    if path == "/" {
        "/".to_string()
    } else {
        format!("{}/", path)
    }
}

impl State {
    fn status_json(&self, path: &str, entry: &Entry, suffix: &str) -> Value {
        let children = if entry.kind == FileType::Directory {
            self.children(path).len()
        } else {
            0
        };
        let (block_size, replication) = if entry.kind == FileType::File {
            (134_217_728u64, 3u16)
        } else {
            (0, 0)
        };
        let mut value = json!({
            "type": entry.kind,
            "length": entry.data.len(),
            "owner": entry.owner,
            "group": entry.group,
            "permission": entry.permission,
            "modificationTime": entry.mtime,
            "accessTime": entry.atime,
            "pathSuffix": suffix,
            "blockSize": block_size,
            "replication": replication,
            "childrenNum": children,
            "storagePolicy": 0
        });
        if let Some(target) = &entry.symlink {
            value["symlink"] = json!(target);
        }
        value
    }

    /// Immediate children, in name order.
    fn children(&self, path: &str) -> Vec<(String, Entry)> {
        let prefix = child_prefix(path);
        self.entries
            .iter()
            .filter(|(p, _)| {
                p.as_str() != path
                    && p.starts_with(&prefix)
                    && !p[prefix.len()..].contains('/')
            })
            .map(|(p, e)| (p.clone(), e.clone()))
            .collect()
    }

    fn subtree(&self, path: &str) -> Vec<String> {
        let prefix = child_prefix(path);
        self.entries
            .keys()
            .filter(|p| p.as_str() == path || p.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn is_dir(&self, path: &str) -> bool {
        self.entries
            .get(path)
            .is_some_and(|e| e.kind == FileType::Directory)
    }

    fn handle(&mut self, req: &Recorded) -> RawResponse {
        let path = req.path.as_str();
        match req.op {
            Op::GetHomeDirectory => RawResponse::json(200, &json!({ "Path": self.home })),
            Op::GetFileStatus => match self.entries.get(path) {
                Some(entry) => {
                    RawResponse::json(200, &json!({ "FileStatus": self.status_json(path, entry, "") }))
                }
                None => not_found(path),
            },
            Op::ListStatus => match self.entries.get(path) {
                Some(entry) if entry.kind == FileType::Directory => {
                    let list: Vec<Value> = self
                        .children(path)
                        .iter()
                        .map(|(p, e)| self.status_json(p, e, name_of(p)))
                        .collect();
                    RawResponse::json(200, &json!({ "FileStatuses": { "FileStatus": list } }))
                }
                Some(entry) => {
                    let single = self.status_json(path, entry, "");
                    RawResponse::json(200, &json!({ "FileStatuses": { "FileStatus": [single] } }))
                }
                None => not_found(path),
            },
            Op::GetContentSummary => {
                if !self.entries.contains_key(path) {
                    return not_found(path);
                }
                let (mut dirs, mut files, mut length) = (0u64, 0u64, 0u64);
                for p in self.subtree(path) {
                    let entry = &self.entries[&p];
                    match entry.kind {
                        FileType::Directory => dirs += 1,
                        _ => {
                            files += 1;
                            length += entry.data.len() as u64;
                        }
                    }
                }
                RawResponse::json(
                    200,
                    &json!({ "ContentSummary": {
                        "directoryCount": dirs,
                        "fileCount": files,
                        "length": length,
                        "quota": -1,
                        "spaceConsumed": length * 3,
                        "spaceQuota": -1
                    }}),
                )
            }
            Op::Open => match self.entries.get(path) {
                Some(entry) if entry.kind == FileType::File => RawResponse::from_bytes(
                    200,
                    Some("application/octet-stream"),
                    entry.data.clone(),
                ),
                Some(_) => remote_exception(404, "FileNotFoundException", &format!("Path is not a file: {}", path)),
                None => not_found(path),
            },
            Op::Create => {
                let overwrite = req.param("overwrite") == Some("true");
                if let Some(entry) = self.entries.get(path) {
                    if entry.kind == FileType::Directory {
                        return remote_exception(403, "FileAlreadyExistsException", &format!("{} is a directory", path));
                    }
                    if !overwrite {
                        return remote_exception(403, "FileAlreadyExistsException", &format!("{} already exists", path));
                    }
                }
                if let Err(response) = self.make_parents(&parent_of(path)) {
                    return response;
                }
                let permission = req.param("permission").unwrap_or("755");
                self.entries
                    .insert(path.to_string(), Entry::file(req.body.clone(), permission));
                RawResponse::from_bytes(201, None, Vec::new())
            }
            Op::Append => match self.entries.get_mut(path) {
                Some(entry) if entry.kind == FileType::File => {
                    entry.data.extend_from_slice(&req.body);
                    ok_empty()
                }
                _ => not_found(path),
            },
            Op::Concat => {
                let sources: Vec<String> = req
                    .param("sources")
                    .unwrap_or_default()
                    .split(',')
                    .map(str::to_string)
                    .collect();
                if !self.entries.contains_key(path) {
                    return not_found(path);
                }
                for src in &sources {
                    match self.entries.get(src) {
                        Some(entry) if entry.kind == FileType::File => {}
                        _ => return not_found(src),
                    }
                }
                for src in &sources {
                    if let Some(entry) = self.entries.remove(src) {
                        if let Some(target) = self.entries.get_mut(path) {
                            target.data.extend_from_slice(&entry.data);
                        }
                    }
                }
                ok_empty()
            }
            Op::Rename => {
                let Some(dest) = req.param("destination").map(str::to_string) else {
                    return remote_exception(400, "IllegalArgumentException", "destination missing");
                };
                boolean(self.rename(path, &dest))
            }
            Op::Delete => {
                if !self.entries.contains_key(path) {
                    return boolean(false);
                }
                let recursive = req.param("recursive") == Some("true");
                if !recursive && self.is_dir(path) && !self.children(path).is_empty() {
                    return remote_exception(
                        403,
                        "PathIsNotEmptyDirectoryException",
                        &format!("{} is non empty", path),
                    );
                }
                for p in self.subtree(path) {
                    self.entries.remove(&p);
                }
                boolean(true)
            }
            Op::Mkdirs => match self.make_parents(path) {
                Ok(()) => {
                    if let (Some(permission), Some(entry)) =
                        (req.param("permission"), self.entries.get_mut(path))
                    {
                        entry.permission = permission.to_string();
                    }
                    boolean(true)
                }
                Err(response) => response,
            },
            Op::SetOwner => match self.entries.get_mut(path) {
                Some(entry) => {
                    if let Some(owner) = req.param("owner") {
                        entry.owner = owner.to_string();
                    }
                    if let Some(group) = req.param("group") {
                        entry.group = group.to_string();
                    }
                    ok_empty()
                }
                None => not_found(path),
            },
            Op::SetPermission => match self.entries.get_mut(path) {
                Some(entry) => {
                    entry.permission = req.param("permission").unwrap_or("755").to_string();
                    ok_empty()
                }
                None => not_found(path),
            },
            Op::SetTimes => match self.entries.get_mut(path) {
                Some(entry) => {
                    let parse = |key| req.param(key).and_then(|v| v.parse::<i64>().ok()).unwrap_or(-1);
                    let (mtime, atime) = (parse("modificationtime"), parse("accesstime"));
                    if mtime >= 0 {
                        entry.mtime = mtime;
                    }
                    if atime >= 0 {
                        entry.atime = atime;
                    }
                    ok_empty()
                }
                None => not_found(path),
            },
            Op::CreateSymlink => {
                if self.entries.contains_key(path) {
                    return remote_exception(403, "FileAlreadyExistsException", &format!("{} already exists", path));
                }
                let parent = parent_of(path);
                if !self.entries.contains_key(&parent) {
                    if req.param("createParent") != Some("true") {
                        return not_found(&parent);
                    }
                    if let Err(response) = self.make_parents(&parent) {
                        return response;
                    }
                }
                let mut entry = Entry::file(Vec::new(), "777");
                entry.kind = FileType::Symlink;
                entry.symlink = req.param("destination").map(str::to_string);
                self.entries.insert(path.to_string(), entry);
                ok_empty()
            }
        }
    }

    /// Create `path` and its ancestors as directories.
    fn make_parents(&mut self, path: &str) -> Result<(), RawResponse> {
        let mut current = String::new();
        let mut chain = vec!["/".to_string()];
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            chain.push(current.clone());
        }
        for p in &chain {
            if let Some(entry) = self.entries.get(p) {
                if entry.kind != FileType::Directory {
                    return Err(remote_exception(
                        403,
                        "ParentNotDirectoryException",
                        &format!("{} is not a directory", p),
                    ));
                }
            }
        }
        for p in chain {
            self.entries.entry(p).or_insert_with(|| Entry::dir("755"));
        }
        Ok(())
    }

    fn rename(&mut self, src: &str, dest: &str) -> bool {
        if src == "/" || !self.entries.contains_key(src) {
            return false;
        }
        let target = if self.is_dir(dest) {
            format!("{}{}", child_prefix(dest), name_of(src))
        } else {
            dest.to_string()
        };
        if self.entries.contains_key(&target)
            || !self.is_dir(&parent_of(&target))
            || target.starts_with(&child_prefix(src))
        {
            return false;
        }

        for old in self.subtree(src) {
            if let Some(entry) = self.entries.remove(&old) {
                let new = format!("{}{}", target, &old[src.len()..]);
                self.entries.insert(new, entry);
            }
        }
        true
    }
}
