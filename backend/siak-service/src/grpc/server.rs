use super::siak::mhs_biodata_api_service_server::MhsBiodataApiService;
use super::siak::*;
use crate::models::AlumniVerdict;
use crate::upstream::{BiodataSource, FetchOutcome};
use grpc_jwt_propagation::JwtClaimsExt;
use prost::Message;
use resilience::with_timeout;
use std::sync::Arc;
use std::time::Duration;
use tonic::{Code, Request, Response, Status};
use tracing::Instrument;

const HTTP_OK: u32 = 200;
const HTTP_BAD_REQUEST: u32 = 400;
const HTTP_NOT_FOUND: u32 = 404;
const HTTP_INTERNAL_SERVER_ERROR: u32 = 500;

/// Non-OK status whose details carry the encoded response payload
///
/// Callers can read either the status or the payload and reach the same
/// conclusion.
fn status_with_payload<M: Message>(code: Code, payload: &M, message: &str) -> Status {
    Status::with_details(code, message, payload.encode_to_vec().into())
}

/// gRPC service implementation
#[derive(Clone)]
pub struct MhsBiodataApiHandler {
    source: Arc<dyn BiodataSource>,
    fetch_deadline: Duration,
}

impl MhsBiodataApiHandler {
    pub fn new(source: Arc<dyn BiodataSource>, fetch_deadline: Duration) -> Self {
        Self {
            source,
            fetch_deadline,
        }
    }

    /// Source lookup bounded by the overall deadline
    async fn lookup(&self, nim: &str) -> FetchOutcome {
        match with_timeout(self.fetch_deadline, self.source.fetch(nim)).await {
            Ok(outcome) => outcome,
            Err(elapsed) => {
                tracing::error!(error = %elapsed, "Upstream lookup abandoned");
                FetchOutcome::TransientFailure("upstream deadline exceeded".to_string())
            }
        }
    }
}

fn caller_id<T>(request: &Request<T>) -> Option<u32> {
    request.jwt_claims().ok().map(|claims| claims.id)
}

#[tonic::async_trait]
impl MhsBiodataApiService for MhsBiodataApiHandler {
    async fn fetch_mhs_biodata_by_nim(
        &self,
        request: Request<MhsBiodataApiRequest>,
    ) -> Result<Response<MhsBiodataApiResponse>, Status> {
        let user_id = caller_id(&request);
        let req = request.into_inner();
        let span = tracing::info_span!("fetch_mhs_biodata_by_nim", nim = %req.nim, user_id = ?user_id);

        async move {
            if req.nim.is_empty() {
                tracing::warn!("Rejected request without nim");
                let payload = MhsBiodataApiResponse {
                    code: HTTP_BAD_REQUEST,
                    message: "nim is required".to_string(),
                    data: None,
                };
                return Err(status_with_payload(Code::InvalidArgument, &payload, &payload.message));
            }

            match self.lookup(&req.nim).await {
                FetchOutcome::Found(record) => Ok(Response::new(MhsBiodataApiResponse {
                    code: HTTP_OK,
                    message: "get mhs biodata success".to_string(),
                    data: Some(record.into()),
                })),
                FetchOutcome::NotFound => {
                    tracing::warn!("Resource not found");
                    let payload = MhsBiodataApiResponse {
                        code: HTTP_NOT_FOUND,
                        message: "mhsbiodata not found".to_string(),
                        data: None,
                    };
                    Err(status_with_payload(Code::NotFound, &payload, &payload.message))
                }
                FetchOutcome::TransientFailure(cause) | FetchOutcome::PermanentFailure(cause) => {
                    tracing::error!(error = %cause, "Error while fetching mhs biodata");
                    let payload = MhsBiodataApiResponse {
                        code: HTTP_INTERNAL_SERVER_ERROR,
                        message: cause,
                        data: None,
                    };
                    Err(status_with_payload(Code::Internal, &payload, &payload.message))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn check_mhs_alumni(
        &self,
        request: Request<CheckMhsAlumniRequest>,
    ) -> Result<Response<CheckMhsAlumniResponse>, Status> {
        let user_id = caller_id(&request);
        let req = request.into_inner();
        let span = tracing::info_span!(
            "check_mhs_alumni",
            nim = %req.nim,
            tgl_sidang = %req.tgl_sidang,
            user_id = ?user_id
        );

        async move {
            let missing = if req.nim.is_empty() {
                Some("nim is required")
            } else if req.tgl_sidang.is_empty() {
                Some("tgl_sidang is required")
            } else {
                None
            };
            if let Some(message) = missing {
                tracing::warn!(reason = message, "Rejected incomplete request");
                let payload = CheckMhsAlumniResponse {
                    code: HTTP_BAD_REQUEST,
                    message: message.to_string(),
                    is_alumni: false,
                };
                return Err(status_with_payload(Code::InvalidArgument, &payload, message));
            }

            let record = match self.lookup(&req.nim).await {
                FetchOutcome::Found(record) => record,
                FetchOutcome::NotFound => {
                    tracing::warn!("Resource not found");
                    let payload = CheckMhsAlumniResponse {
                        code: HTTP_NOT_FOUND,
                        message: "mahasiswa not found".to_string(),
                        is_alumni: false,
                    };
                    return Err(status_with_payload(Code::NotFound, &payload, &payload.message));
                }
                FetchOutcome::TransientFailure(cause) | FetchOutcome::PermanentFailure(cause) => {
                    tracing::error!(error = %cause, "Error while fetching mhs biodata");
                    let payload = CheckMhsAlumniResponse {
                        code: HTTP_INTERNAL_SERVER_ERROR,
                        message: cause,
                        is_alumni: false,
                    };
                    return Err(status_with_payload(Code::Internal, &payload, &payload.message));
                }
            };

            let verdict = record.alumni_verdict(&req.tgl_sidang);
            let message = match verdict {
                AlumniVerdict::DateMismatch => {
                    tracing::warn!("Tanggal sidang not match");
                    "tanggal sidang not match"
                }
                AlumniVerdict::Alumni => "get mhs status alumni success",
                AlumniVerdict::NotYetAlumni => {
                    tracing::warn!("Mahasiswa is not alumni yet");
                    "mahasiswa is not alumni yet"
                }
            };

            Ok(Response::new(CheckMhsAlumniResponse {
                code: HTTP_OK,
                message: message.to_string(),
                is_alumni: verdict.is_alumni(),
            }))
        }
        .instrument(span)
        .await
    }
}
