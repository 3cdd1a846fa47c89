use rocket::serde::{Deserialize, Serialize};

use crate::model::{Count, Workload};
use crate::timing::{run_blocking, WorkloadError, WorkloadResponse};

const DEFAULT_N: u64 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonResult {
    pub count: u64,
    pub json_bytes: usize,
}

#[derive(Debug, Serialize)]
struct Item {
    id: u64,
    name: String,
    value: u64,
    flag: bool,
}

#[derive(Debug, Serialize)]
struct Payload {
    workload: Workload,
    count: u64,
    items: Vec<Item>,
}

fn build_payload(n: u64) -> Payload {
    let items = (0..n)
        .map(|i| Item {
            id: i,
            name: format!("item_{i}"),
            value: i * 3,
            flag: i % 2 == 0,
        })
        .collect();
    Payload {
        workload: Workload::Json,
        count: n,
        items,
    }
}

/// Builds `n` synthetic records and returns the byte length of their JSON encoding.
#[tracing::instrument(level = "debug")]
pub fn serialized_len(n: u64) -> Result<usize, WorkloadError> {
    let json = serde_json::to_vec(&build_payload(n))?;
    Ok(json.len())
}

#[get("/json?<n>")]
pub async fn json(n: Option<Count>) -> WorkloadResponse<JsonResult> {
    let n = n.map_or(DEFAULT_N, Count::get);
    run_blocking(Workload::Json, move || {
        Ok(JsonResult {
            count: n,
            json_bytes: serialized_len(n)?,
        })
    })
    .await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::main_rocket;
    use crate::timing::Envelope;
    use rocket::http::Status;
    use rocket::local::blocking::Client;

    #[test]
    fn test_payload_text() {
        let json = serde_json::to_string(&build_payload(3)).unwrap();
        assert_eq!(
            json,
            r#"{"workload":"json","count":3,"items":[{"id":0,"name":"item_0","value":0,"flag":true},{"id":1,"name":"item_1","value":3,"flag":false},{"id":2,"name":"item_2","value":6,"flag":true}]}"#
        );
        assert_eq!(serialized_len(3).unwrap(), 181);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_json_single_item() {
        let client = Client::tracked(main_rocket()).expect("valid rocket instance");
        let response = client.get("/json?n=1").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let r: Envelope<JsonResult> = response.into_json().unwrap();
        assert_eq!(r.workload, Workload::Json);
        // {"workload":"json","count":1,"items":[{"id":0,"name":"item_0","value":0,"flag":true}]}
        assert_eq!(
            r.result,
            JsonResult {
                count: 1,
                json_bytes: 86
            }
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_json_default_and_clamp() {
        let client = Client::tracked(main_rocket()).expect("valid rocket instance");
        let r: Envelope<JsonResult> = client.get("/json").dispatch().into_json().unwrap();
        assert_eq!(r.result.count, DEFAULT_N);
        assert_eq!(r.result.json_bytes, serialized_len(DEFAULT_N).unwrap());

        let r: Envelope<JsonResult> = client.get("/json?n=-3").dispatch().into_json().unwrap();
        assert_eq!(r.result.count, 1);
        assert_eq!(r.result.json_bytes, 86);

        let r: Envelope<JsonResult> = client.get("/json?n=2&n=3").dispatch().into_json().unwrap();
        assert_eq!(r.result.count, 3);
        assert_eq!(r.result.json_bytes, 181);
    }
}
