use mockito::{Matcher, Server, ServerGuard};
use openlist::{
    admin::{
        meta::Meta,
        setting::{Setting, SettingGroup},
        storage::NewStorage,
        task::TaskKind,
        user::NewUser,
    },
    files::{DeletePolicy, ListReq, OfflineTool, RenameObject, SearchReq, SearchScope},
    ErrorKind, OpenList,
};
use serde_json::json;

const SUCCESS: &str = r#"{"code":200,"message":"success","data":null}"#;

async fn setup() -> (OpenList, ServerGuard) {
    let server = Server::new_async().await;
    let openlist = OpenList::new(server.url()).unwrap();

    (openlist, server)
}

fn envelope(data: serde_json::Value) -> String {
    json!({ "code": 200, "message": "success", "data": data }).to_string()
}

#[tokio::test]
async fn login_hash_sends_digest() {
    let (openlist, mut server) = setup().await;

    let mock = server
        .mock("POST", "/api/auth/login/hash")
        .match_body(Matcher::Json(json!({
            "username": "admin",
            "password": "046119821c86ff68c103f32322077b108bde0d58d09c9f85cf98c3471aafa17e"
        })))
        .with_body(envelope(json!({ "token": "abc.def.ghi" })))
        .create_async()
        .await;

    let res = openlist
        .auth()
        .login_hash("admin", "password123", None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(res.data.token, "abc.def.ghi");
    assert_eq!(openlist.token(), None, "login must not store the token");
}

#[tokio::test]
async fn login_with_otp() {
    let (openlist, mut server) = setup().await;

    let mock = server
        .mock("POST", "/api/auth/login")
        .match_body(Matcher::Json(json!({
            "username": "admin",
            "password": "pw",
            "otp_code": "123456"
        })))
        .with_body(envelope(json!({ "token": "t" })))
        .create_async()
        .await;

    openlist
        .auth()
        .login("admin", "pw", Some("123456"))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn wrong_password() {
    let (openlist, mut server) = setup().await;

    server
        .mock("POST", "/api/auth/login")
        .with_status(400)
        .with_body(r#"{"code":400,"message":"password is incorrect","data":null}"#)
        .create_async()
        .await;

    let err = openlist.auth().login("admin", "nope", None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), "password is incorrect");
}

#[tokio::test]
async fn me() {
    let (openlist, mut server) = setup().await;
    openlist.set_token("token");

    server
        .mock("GET", "/api/me")
        .match_header("authorization", "token")
        .with_body(envelope(json!({
            "id": 1,
            "username": "admin",
            "password": "",
            "base_path": "/",
            "role": 2,
            "disabled": false,
            "permission": 0,
            "sso_id": "",
            "otp": false
        })))
        .create_async()
        .await;

    let user = openlist.auth().me().await.unwrap().data;

    assert_eq!(user.username, "admin");
    assert_eq!(user.role, 2);
}

#[tokio::test]
async fn list_folder() {
    let (openlist, mut server) = setup().await;

    server
        .mock("POST", "/api/fs/list")
        .match_body(Matcher::Json(json!({
            "path": "/docs",
            "password": "",
            "page": 1,
            "per_page": 0,
            "refresh": true
        })))
        .with_body(envelope(json!({
            "content": null,
            "total": 0,
            "readme": "",
            "header": "",
            "write": true,
            "provider": "Local"
        })))
        .create_async()
        .await;

    let res = openlist
        .fs()
        .list(&ListReq::new("/docs").refresh(true))
        .await
        .unwrap();

    assert!(res.is_success());
    assert!(res.data.content.is_empty());
    assert_eq!(res.data.provider, "Local");
}

#[tokio::test]
async fn envelope_shape_mismatch_is_a_protocol_error() {
    let (openlist, mut server) = setup().await;

    server
        .mock("POST", "/api/fs/list")
        .with_body(r#"{"code":200,"message":"success","data":{"content":"nope"}}"#)
        .create_async()
        .await;

    let err = openlist.fs().list(&ListReq::new("/")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn search_and_dirs() {
    let (openlist, mut server) = setup().await;

    server
        .mock("POST", "/api/fs/search")
        .match_body(Matcher::PartialJson(json!({ "scope": 1, "keywords": "photos" })))
        .with_body(envelope(json!({
            "content": [{ "parent": "/", "name": "photos", "is_dir": true, "size": 0, "type": 1 }],
            "total": 1
        })))
        .create_async()
        .await;

    server
        .mock("POST", "/api/fs/dirs")
        .match_body(Matcher::Json(json!({ "path": "/", "password": "", "force_root": false })))
        .with_body(SUCCESS)
        .create_async()
        .await;

    let hits = openlist
        .fs()
        .search(&SearchReq::new("/", "photos").scope(SearchScope::Folders))
        .await
        .unwrap()
        .data;
    assert_eq!(hits.total, 1);
    assert_eq!(hits.content[0].name, "photos");

    let dirs = openlist.fs().dirs("/", "", false).await.unwrap().data;
    assert!(dirs.is_empty());
}

#[tokio::test]
async fn file_operations() {
    let (openlist, mut server) = setup().await;

    let cases = [
        ("/api/fs/rename", json!({ "path": "/a.txt", "name": "b.txt" })),
        (
            "/api/fs/move",
            json!({ "src_dir": "/a", "dst_dir": "/b", "names": ["x", "y"] }),
        ),
        (
            "/api/fs/copy",
            json!({ "src_dir": "/a", "dst_dir": "/b", "names": ["x"] }),
        ),
        ("/api/fs/remove", json!({ "dir": "/a", "names": ["x"] })),
        (
            "/api/fs/batch_rename",
            json!({ "src_dir": "/a", "rename_objects": [{ "src_name": "x", "new_name": "y" }] }),
        ),
        (
            "/api/fs/regex_rename",
            json!({ "src_dir": "/a", "src_name_regex": "^(.+)\\.txt$", "new_name_regex": "$1.bak" }),
        ),
        ("/api/fs/recursive_move", json!({ "src_dir": "/a", "dst_dir": "/b" })),
        ("/api/fs/remove_empty_directory", json!({ "src_dir": "/a" })),
    ];

    let mut mocks = Vec::new();
    for (path, body) in cases {
        mocks.push(
            server
                .mock("POST", path)
                .match_body(Matcher::Json(body))
                .with_body(SUCCESS)
                .create_async()
                .await,
        );
    }

    let fs = openlist.fs();
    fs.rename("/a.txt", "b.txt").await.unwrap();
    fs.move_to("/a", "/b", &["x", "y"]).await.unwrap();
    fs.copy("/a", "/b", &["x"]).await.unwrap();
    fs.remove("/a", &["x"]).await.unwrap();
    fs.batch_rename("/a", &[RenameObject::new("x", "y")])
        .await
        .unwrap();
    fs.regex_rename("/a", r"^(.+)\.txt$", "$1.bak").await.unwrap();
    fs.recursive_move("/a", "/b").await.unwrap();
    fs.remove_empty_directory("/a").await.unwrap();

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn offline_download() {
    let (openlist, mut server) = setup().await;

    server
        .mock("POST", "/api/fs/add_offline_download")
        .match_body(Matcher::Json(json!({
            "path": "/downloads",
            "urls": ["https://example.com/a.zip"],
            "tool": "aria2",
            "delete_policy": "delete_never"
        })))
        .with_body(envelope(json!({
            "tasks": [{
                "id": "t1",
                "name": "download https://example.com/a.zip",
                "state": 0,
                "status": "",
                "progress": 0,
                "error": ""
            }]
        })))
        .create_async()
        .await;

    let tasks = openlist
        .fs()
        .add_offline_download(
            "/downloads",
            &["https://example.com/a.zip"],
            OfflineTool::Aria2,
            DeletePolicy::DeleteNever,
        )
        .await
        .unwrap()
        .data
        .tasks;

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "t1");
}

#[tokio::test]
async fn stream_upload_headers() {
    let (openlist, mut server) = setup().await;

    let mock = server
        .mock("PUT", "/api/fs/put")
        .match_header("file-path", "%2F%E6%96%87%E4%BB%B6%2Fa%20b.txt")
        .match_header("as-task", "false")
        .match_header("content-type", "application/octet-stream")
        .match_body("hello")
        .with_body(SUCCESS)
        .create_async()
        .await;

    let res = openlist
        .fs()
        .stream_upload("/文件/a b.txt", "hello", false)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(res.data.task.is_none());
}

#[tokio::test]
async fn finished_uploads_have_no_task() {
    let (openlist, mut server) = setup().await;

    let put = server
        .mock("PUT", "/api/fs/put")
        .match_header("as-task", "false")
        .with_body(SUCCESS)
        .create_async()
        .await;
    let form = server
        .mock("PUT", "/api/fs/form")
        .match_header("as-task", "false")
        .with_body(SUCCESS)
        .create_async()
        .await;

    let streamed = openlist
        .fs()
        .stream_upload("/a.txt", "hello", false)
        .await
        .unwrap();
    let posted = openlist
        .fs()
        .form_upload("/a.txt", b"hello".to_vec(), false)
        .await
        .unwrap();

    put.assert_async().await;
    form.assert_async().await;
    assert!(streamed.is_success());
    assert_eq!(streamed.data.task, None);
    assert_eq!(posted.data.task, None);
}

#[tokio::test]
async fn form_upload_headers() {
    let (openlist, mut server) = setup().await;

    let mock = server
        .mock("PUT", "/api/fs/form")
        .match_header(
            "file-path",
            "%2F%E4%B8%8A%E4%BC%A0%2F%E6%8A%A5%E5%91%8A%202024.pdf",
        )
        .match_header("as-task", "true")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file""#.into()),
            Matcher::Regex("%PDF-1.7".into()),
        ]))
        .with_body(envelope(json!({
            "task": {
                "id": "u1",
                "name": "upload 报告 2024.pdf to [/上传](/)",
                "state": 1,
                "status": "uploading",
                "progress": 12.5,
                "error": ""
            }
        })))
        .create_async()
        .await;

    let res = openlist
        .fs()
        .form_upload("/上传/报告 2024.pdf", b"%PDF-1.7 ...".to_vec(), true)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(res.data.task.unwrap().id, "u1");
}

#[tokio::test]
async fn public_endpoints() {
    let (openlist, mut server) = setup().await;

    server
        .mock("GET", "/ping")
        .with_header("content-type", "text/plain")
        .with_body("pong")
        .create_async()
        .await;

    server
        .mock("GET", "/api/public/settings")
        .with_body(envelope(json!({
            "site_title": "OpenList",
            "version": "v4.0.0",
            "allow_indexed": "false"
        })))
        .create_async()
        .await;

    assert_eq!(openlist.public().ping().await.unwrap(), "pong");

    let settings = openlist.public().settings().await.unwrap().data;
    assert_eq!(settings.version, "v4.0.0");
    assert_eq!(settings.extra["allow_indexed"], "false");
}

#[tokio::test]
async fn admin_meta() {
    let (openlist, mut server) = setup().await;
    let meta = openlist.admin().meta();

    let list = server
        .mock("GET", "/api/admin/meta/list")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("per_page".into(), "10".into()),
        ]))
        .with_body(envelope(json!({ "content": [], "total": 0 })))
        .create_async()
        .await;

    let create = server
        .mock("POST", "/api/admin/meta/create")
        .match_body(Matcher::PartialJson(json!({ "id": 0, "path": "/secret", "password": "pw" })))
        .with_body(SUCCESS)
        .create_async()
        .await;

    let delete = server
        .mock("POST", "/api/admin/meta/delete")
        .match_query(Matcher::UrlEncoded("id".into(), "7".into()))
        .with_body(SUCCESS)
        .create_async()
        .await;

    meta.list(Some(2), Some(10)).await.unwrap();
    meta.create(&Meta {
        id: 99,
        password: "pw".into(),
        ..Meta::new("/secret")
    })
    .await
    .unwrap();
    meta.delete(7).await.unwrap();

    list.assert_async().await;
    create.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn admin_users() {
    let (openlist, mut server) = setup().await;
    let users = openlist.admin().user();

    let create = server
        .mock("POST", "/api/admin/user/create")
        .match_body(Matcher::PartialJson(json!({ "id": 0, "username": "alice", "base_path": "/" })))
        .with_body(SUCCESS)
        .create_async()
        .await;

    let del_cache = server
        .mock("POST", "/api/admin/user/del_cache")
        .match_query(Matcher::UrlEncoded("username".into(), "alice".into()))
        .with_body(SUCCESS)
        .create_async()
        .await;

    users.create(&NewUser::new("alice", "pw")).await.unwrap();
    users.delete_cache("alice").await.unwrap();

    create.assert_async().await;
    del_cache.assert_async().await;
}

#[tokio::test]
async fn admin_storage() {
    let (openlist, mut server) = setup().await;
    let storage = openlist.admin().storage();

    let list = server
        .mock("GET", "/api/admin/storage/list")
        .with_body(envelope(json!({ "content": null, "total": 0 })))
        .create_async()
        .await;

    server
        .mock("POST", "/api/admin/storage/create")
        .match_body(Matcher::PartialJson(json!({
            "id": 0,
            "mount_path": "/local",
            "driver": "Local",
            "cache_expiration": 30
        })))
        .with_body(envelope(json!({ "id": 5 })))
        .create_async()
        .await;

    let disable = server
        .mock("POST", "/api/admin/storage/disable")
        .match_query(Matcher::UrlEncoded("id".into(), "5".into()))
        .with_body(SUCCESS)
        .create_async()
        .await;

    assert!(storage.list(None, None).await.unwrap().data.content.is_empty());

    let id = storage
        .create(&NewStorage::new("/local", "Local", "{}"))
        .await
        .unwrap()
        .data
        .id;
    assert_eq!(id, 5);

    storage.disable(id).await.unwrap();

    list.assert_async().await;
    disable.assert_async().await;
}

#[tokio::test]
async fn admin_drivers() {
    let (openlist, mut server) = setup().await;

    server
        .mock("GET", "/api/admin/driver/names")
        .with_body(envelope(json!(["Local", "S3"])))
        .create_async()
        .await;

    server
        .mock("GET", "/api/admin/driver/info")
        .match_query(Matcher::UrlEncoded("driver".into(), "Local".into()))
        .with_body(envelope(json!({
            "common": [],
            "additional": [{ "name": "root_folder_path", "type": "string", "required": true }],
            "config": { "name": "Local", "local_sort": true }
        })))
        .create_async()
        .await;

    let drivers = openlist.admin().driver();

    assert_eq!(drivers.names().await.unwrap(), ["Local", "S3"]);

    let info = drivers.info("Local").await.unwrap().data;
    assert_eq!(info.additional[0].name, "root_folder_path");
    assert_eq!(info.config["local_sort"], true);
}

#[tokio::test]
async fn admin_settings() {
    let (openlist, mut server) = setup().await;
    let settings = openlist.admin().setting();

    server
        .mock("GET", "/api/admin/setting/list")
        .match_query(Matcher::UrlEncoded("groups".into(), "5,7".into()))
        .with_body(envelope(json!([{ "key": "token", "value": "x", "group": 5 }])))
        .create_async()
        .await;

    server
        .mock("GET", "/api/admin/setting/get")
        .match_query(Matcher::UrlEncoded("key".into(), "missing".into()))
        .with_body(SUCCESS)
        .create_async()
        .await;

    let save = server
        .mock("POST", "/api/admin/setting/save")
        .match_body(Matcher::Json(json!([{ "key": "site_title", "value": "Mine" }])))
        .with_body(SUCCESS)
        .create_async()
        .await;

    let qbit = server
        .mock("POST", "/api/admin/setting/set_qbit")
        .match_body(Matcher::Json(json!({ "url": "http://qbit:8080", "seedtime": 60 })))
        .with_body(SUCCESS)
        .create_async()
        .await;

    let listed = settings
        .list(None, Some(&[SettingGroup::Other, SettingGroup::Sso]))
        .await
        .unwrap();
    assert_eq!(listed[0].key, "token");

    assert_eq!(settings.get("missing").await.unwrap(), None);

    settings
        .save(&[Setting::new("site_title", "Mine")])
        .await
        .unwrap();
    settings.set_qbittorrent("http://qbit:8080", 60).await.unwrap();

    save.assert_async().await;
    qbit.assert_async().await;
}

#[tokio::test]
async fn admin_tasks() {
    let (openlist, mut server) = setup().await;

    server
        .mock("GET", "/api/admin/task/upload/undone")
        .with_body(SUCCESS)
        .create_async()
        .await;

    let retry = server
        .mock("POST", "/api/admin/task/offline_download/retry")
        .match_query(Matcher::UrlEncoded("tid".into(), "abc".into()))
        .with_body(SUCCESS)
        .create_async()
        .await;

    let clear = server
        .mock("POST", "/api/admin/task/copy/clear_succeeded")
        .with_body(SUCCESS)
        .create_async()
        .await;

    let admin = openlist.admin();

    assert!(admin.task().undone().await.unwrap().data.is_empty());
    admin
        .task_of(TaskKind::OfflineDownload)
        .retry("abc")
        .await
        .unwrap();
    admin.task_of(TaskKind::Copy).clear_succeeded().await.unwrap();

    retry.assert_async().await;
    clear.assert_async().await;
}
