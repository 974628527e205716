//! Alimtalk template catalog and `#{key}` rendering.
//!
//! Every business event maps to one pre-registered provider template with a
//! fixed, ordered parameter list. The body text mirrors the registered
//! template so that the rendered message passes the provider's content
//! match.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Customer support number appended to every message.
pub const SUPPORT_PHONE: &str = "1833-6025";

/// Which KakaoTalk channel the template is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// `@크넥` channel, sent to companies.
    Company,
    /// `@크넥_크리에이터` channel, sent to creators.
    Creator,
}

/// A named business event that triggers an alimtalk message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    // Company
    Signup,
    PaymentRequest,
    PointChargeComplete,
    CampaignApproved,
    RecruitmentClosed,
    GuideSubmitted,
    VideoSubmitted,
    CampaignCompleted,
    CampaignReviewRequested,
    // Creator
    CreatorSignup,
    CampaignSelected,
    CampaignCancelled,
    GuideDelivered,
    #[serde(rename = "video_deadline_3days")]
    VideoDeadline3Days,
    #[serde(rename = "video_deadline_2days")]
    VideoDeadline2Days,
    VideoDeadlineToday,
    VideoRevisionRequested,
    VideoApproved,
    CampaignRewardPaid,
    WithdrawalRequested,
    WithdrawalCompleted,
    DeadlineOverdue,
}

impl NotificationEvent {
    pub const ALL: [NotificationEvent; 22] = [
        NotificationEvent::Signup,
        NotificationEvent::PaymentRequest,
        NotificationEvent::PointChargeComplete,
        NotificationEvent::CampaignApproved,
        NotificationEvent::RecruitmentClosed,
        NotificationEvent::GuideSubmitted,
        NotificationEvent::VideoSubmitted,
        NotificationEvent::CampaignCompleted,
        NotificationEvent::CampaignReviewRequested,
        NotificationEvent::CreatorSignup,
        NotificationEvent::CampaignSelected,
        NotificationEvent::CampaignCancelled,
        NotificationEvent::GuideDelivered,
        NotificationEvent::VideoDeadline3Days,
        NotificationEvent::VideoDeadline2Days,
        NotificationEvent::VideoDeadlineToday,
        NotificationEvent::VideoRevisionRequested,
        NotificationEvent::VideoApproved,
        NotificationEvent::CampaignRewardPaid,
        NotificationEvent::WithdrawalRequested,
        NotificationEvent::WithdrawalCompleted,
        NotificationEvent::DeadlineOverdue,
    ];

    /// Position of this event's template in the catalog.
    const fn catalog_index(self) -> usize {
        match self {
            NotificationEvent::Signup => 0,
            NotificationEvent::PaymentRequest => 1,
            NotificationEvent::PointChargeComplete => 2,
            NotificationEvent::CampaignApproved => 3,
            NotificationEvent::RecruitmentClosed => 4,
            NotificationEvent::GuideSubmitted => 5,
            NotificationEvent::VideoSubmitted => 6,
            NotificationEvent::CampaignCompleted => 7,
            NotificationEvent::CampaignReviewRequested => 8,
            NotificationEvent::CreatorSignup => 9,
            NotificationEvent::CampaignSelected => 10,
            NotificationEvent::CampaignCancelled => 11,
            NotificationEvent::GuideDelivered => 12,
            NotificationEvent::VideoDeadline3Days => 13,
            NotificationEvent::VideoDeadline2Days => 14,
            NotificationEvent::VideoDeadlineToday => 15,
            NotificationEvent::VideoRevisionRequested => 16,
            NotificationEvent::VideoApproved => 17,
            NotificationEvent::CampaignRewardPaid => 18,
            NotificationEvent::WithdrawalRequested => 19,
            NotificationEvent::WithdrawalCompleted => 20,
            NotificationEvent::DeadlineOverdue => 21,
        }
    }
}

/// A provider-registered alimtalk template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlimtalkTemplate {
    pub event: NotificationEvent,
    pub audience: Audience,
    /// Provider template code.
    pub code: &'static str,
    pub name: &'static str,
    /// Parameter names, in the order the provider expects them.
    pub params: &'static [&'static str],
    /// Parameters that may be omitted; they bind to an empty string.
    pub optional: &'static [&'static str],
    /// Email subject used when the same event is also mailed.
    pub subject: &'static str,
    pub body: &'static str,
}

/// Look up the template registered for an event.
pub fn template_for(event: NotificationEvent) -> &'static AlimtalkTemplate {
    &CATALOG[event.catalog_index()]
}

/// Find a template by its provider code.
pub fn find_by_code(code: &str) -> Option<&'static AlimtalkTemplate> {
    CATALOG.iter().find(|t| t.code == code)
}

/// Find a template by its display name.
pub fn find_by_name(name: &str) -> Option<&'static AlimtalkTemplate> {
    CATALOG.iter().find(|t| t.name == name)
}

/// Every registered template, company templates first.
pub fn catalog() -> &'static [AlimtalkTemplate] {
    &CATALOG
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Substitute `#{key}` placeholders in a single left-to-right pass.
///
/// Placeholders whose key is in `params` are replaced; others are left
/// untouched, braces included. Substituted values are never re-scanned, so
/// a value containing `#{...}` is emitted literally.
///
/// ```
/// use std::collections::HashMap;
/// use cnec_core::alimtalk::render;
///
/// let params = HashMap::from([("name".to_string(), "Mina".to_string())]);
/// assert_eq!(render("Hi #{name}, #{missing}", &params), "Hi Mina, #{missing}");
/// ```
pub fn render(template: &str, params: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("#{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match params.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("#{");
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated placeholder: copy the remainder verbatim.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Bind caller-supplied values to the template's ordered parameter list.
///
/// Extra keys are ignored. A missing required parameter is a validation
/// error; a missing optional one binds to `""`.
pub fn bind(
    template: &AlimtalkTemplate,
    values: &HashMap<String, String>,
) -> Result<Vec<(&'static str, String)>, CoreError> {
    let mut bound = Vec::with_capacity(template.params.len());
    let mut missing = Vec::new();

    for &name in template.params {
        match values.get(name) {
            Some(v) => bound.push((name, v.clone())),
            None if template.optional.contains(&name) => bound.push((name, String::new())),
            None => missing.push(name),
        }
    }

    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Template {} ({}) is missing parameters: {}",
            template.code,
            template.name,
            missing.join(", ")
        )));
    }

    Ok(bound)
}

/// Bind and render an event's body in one step.
pub fn render_event(
    event: NotificationEvent,
    values: &HashMap<String, String>,
) -> Result<String, CoreError> {
    let template = template_for(event);
    let bound: HashMap<String, String> = bind(template, values)?
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    Ok(render(template.body, &bound))
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

static CATALOG: [AlimtalkTemplate; NotificationEvent::ALL.len()] = [
    // ----- Company (@크넥) -----
    AlimtalkTemplate {
        event: NotificationEvent::Signup,
        audience: Audience::Company,
        code: "025100000912",
        name: "회원가입",
        params: &["회원명"],
        optional: &[],
        subject: "[CNEC] 가입을 환영합니다",
        body: "[CNEC] 회원가입 완료\n\
               #{회원명}님, CNEC BIZ에 가입해주셔서 감사합니다.\n\n\
               가입 후 기업 프로필을 설정해 주세요.\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::PaymentRequest,
        audience: Audience::Company,
        code: "025100000918",
        name: "캠페인 신청 및 입금 안내",
        params: &["회사명", "캠페인명", "금액"],
        optional: &[],
        subject: "[CNEC] 포인트 충전 입금 안내",
        body: "[CNEC] 캠페인 신청 및 입금 안내\n\
               #{회사명}님, #{캠페인명} 신청이 완료되었습니다.\n\n\
               입금 금액: #{금액}원\n\n\
               입금 확인 후 캠페인이 승인됩니다.\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::PointChargeComplete,
        audience: Audience::Company,
        code: "025100000943",
        name: "포인트 충전 완료",
        params: &["회사명", "포인트", "캠페인명"],
        optional: &["캠페인명"],
        subject: "[CNEC] 포인트 충전 완료",
        body: "[CNEC] 포인트 충전 완료\n\
               #{회사명}님, 포인트 충전이 완료되었습니다.\n\n\
               충전 포인트: #{포인트}P\n\
               캠페인: #{캠페인명}\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::CampaignApproved,
        audience: Audience::Company,
        code: "025100001005",
        name: "캠페인 승인 및 모집 시작",
        params: &["회사명", "캠페인명", "시작일", "마감일", "모집인원"],
        optional: &[],
        subject: "[CNEC] 캠페인 승인 완료",
        body: "[CNEC] 신청하신 캠페인 승인 완료\n\n\
               #{회사명}님, 신청하신 캠페인이 승인되어 크리에이터 모집이 시작되었습니다.\n\n\
               캠페인: #{캠페인명}\n\
               모집 기간: #{시작일} ~ #{마감일}\n\
               모집 인원: #{모집인원}명\n\n\
               관리자 페이지에서 진행 상황을 확인하실 수 있습니다.\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::RecruitmentClosed,
        audience: Audience::Company,
        code: "025100001006",
        name: "모집 마감 크리에이터 선정 요청",
        params: &["회사명", "캠페인명", "지원자수"],
        optional: &[],
        subject: "[CNEC] 캠페인 모집 마감",
        body: "[CNEC] 신청하신 캠페인 모집 마감\n\
               #{회사명}님, 신청하신 캠페인의 크리에이터 모집이 마감되었습니다.\n\
               캠페인: #{캠페인명}\n\
               지원 크리에이터: #{지원자수}명\n\
               관리자 페이지에서 지원한 크리에이터 리스트를 확인하시고, 최종 선정을 진행해 주세요.\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::GuideSubmitted,
        audience: Audience::Company,
        code: "025100001007",
        name: "크리에이터 가이드 제출 검수 요청",
        params: &["회사명", "캠페인명", "크리에이터명"],
        optional: &[],
        subject: "[CNEC] 크리에이터 가이드 검수 요청",
        body: "[CNEC] 크리에이터 가이드 검수 요청\n\
               #{회사명}님, 크리에이터 가이드가 제출되었습니다.\n\
               캠페인: #{캠페인명}\n\
               크리에이터: #{크리에이터명}\n\
               관리자 페이지에서 가이드를 검수해 주세요.\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::VideoSubmitted,
        audience: Audience::Company,
        code: "025100001008",
        name: "영상 촬영 완료 검수 요청",
        params: &["회사명", "캠페인명", "크리에이터명"],
        optional: &[],
        subject: "[CNEC] 영상 검수 요청",
        body: "[CNEC] 신청하신 캠페인 영상 검수 요청\n\
               #{회사명}님, 신청하신 캠페인의 크리에이터가 촬영 영상을 제출했습니다.\n\
               캠페인: #{캠페인명}\n\
               크리에이터: #{크리에이터명}\n\
               관리자 페이지에서 영상을 검수해 주세요.\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::CampaignCompleted,
        audience: Audience::Company,
        code: "025100001009",
        name: "최종 영상 완료 보고서 확인 요청",
        params: &["회사명", "캠페인명"],
        optional: &[],
        subject: "[CNEC] 캠페인 최종 보고서",
        body: "[CNEC] 캠페인 최종 완료\n\
               #{회사명}님, 캠페인이 최종 완료되었습니다.\n\
               캠페인: #{캠페인명}\n\
               관리자 페이지에서 최종 보고서를 확인해 주세요.\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::CampaignReviewRequested,
        audience: Audience::Company,
        code: "025100001010",
        name: "캠페인 검수 신청",
        params: &["회사명", "캠페인명", "시작일", "마감일", "모집인원"],
        optional: &[],
        subject: "[CNEC] 캠페인 검수 신청 접수",
        body: "[CNEC] 캠페인 검수 신청 접수\n\
               #{회사명}님, #{캠페인명} 캠페인 검수 신청이 접수되었습니다.\n\n\
               캠페인 기간: #{시작일} ~ #{마감일}\n\
               모집 인원: #{모집인원}명\n\n\
               검수 완료 후 승인 여부를 알려드리겠습니다. (영업일 기준 1-2일 소요)\n\n\
               문의: 1833-6025",
    },
    // ----- Creator (@크넥_크리에이터) -----
    AlimtalkTemplate {
        event: NotificationEvent::CreatorSignup,
        audience: Audience::Creator,
        code: "025100001022",
        name: "크리에이터 회원가입",
        params: &["이름"],
        optional: &[],
        subject: "[CNEC] 크리에이터 가입을 환영합니다",
        body: "[CNEC] 크리에이터 가입 완료\n\
               #{이름}님, CNEC 크리에이터로 가입해주셔서 감사합니다.\n\n\
               가입 후 크리에이터 프로필을 설정해 주세요.\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::CampaignSelected,
        audience: Audience::Creator,
        code: "025100001011",
        name: "캠페인 선정 완료",
        params: &["크리에이터명", "캠페인명"],
        optional: &[],
        subject: "[CNEC] 캠페인 선정 축하드립니다!",
        body: "[CNEC] 지원하신 캠페인 선정 완료\n\n\
               #{크리에이터명}님, 축하합니다! 지원하신 캠페인에 선정되셨습니다.\n\n\
               캠페인: #{캠페인명}\n\n\
               크리에이터 대시보드에서 캠페인 준비사항을 체크해 주세요.\n\
               촬영 가이드는 2~3일 이내 전달될 예정입니다.\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::CampaignCancelled,
        audience: Audience::Creator,
        code: "025110000796",
        name: "선정 취소",
        params: &["크리에이터명", "캠페인명", "사유"],
        optional: &[],
        subject: "[CNEC] 캠페인 선정 취소 안내",
        body: "[CNEC] 캠페인 선정 취소 안내\n\
               #{크리에이터명}님, 선정되셨던 캠페인이 취소되었습니다.\n\
               캠페인: #{캠페인명}\n\
               사유: #{사유}\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::GuideDelivered,
        audience: Audience::Creator,
        code: "025100001012",
        name: "촬영 가이드 전달 알림",
        params: &["크리에이터명", "캠페인명", "제출기한"],
        optional: &[],
        subject: "[CNEC] 촬영 가이드 전달",
        body: "[CNEC] 촬영 가이드 전달\n\
               #{크리에이터명}님, 참여하신 캠페인의 촬영 가이드가 전달되었습니다.\n\
               캠페인: #{캠페인명}\n\
               영상 제출 기한: #{제출기한}\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::VideoDeadline3Days,
        audience: Audience::Creator,
        code: "025100001013",
        name: "영상 제출 기한 3일 전 안내",
        params: &["크리에이터명", "캠페인명", "제출기한"],
        optional: &[],
        subject: "[CNEC] 영상 제출 기한 3일 전",
        body: "[CNEC] 참여하신 캠페인의 영상 제출 기한 3일 전 안내\n\
               #{크리에이터명}님, 참여하신 캠페인의 영상 제출 기한이 3일 남았습니다.\n\n\
               캠페인: #{캠페인명}\n\
               영상 제출 기한: #{제출기한}\n\n\
               크리에이터 대시보드에서 촬영한 영상을 제출해 주세요.\n\n\
               기한 내 미제출 시 패널티가 부과됩니다.\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::VideoDeadline2Days,
        audience: Audience::Creator,
        code: "025100001014",
        name: "영상 제출 기한 2일 전 안내",
        params: &["크리에이터명", "캠페인명", "제출기한"],
        optional: &[],
        subject: "[CNEC] 영상 제출 기한 2일 전",
        body: "[CNEC] 참여하신 캠페인의 영상 제출 기한 2일 전 안내\n\
               #{크리에이터명}님, 참여하신 캠페인의 영상 제출 기한이 2일 남았습니다.\n\n\
               캠페인: #{캠페인명}\n\
               영상 제출 기한: #{제출기한}\n\n\
               아직 영상이 제출되지 않았습니다. 크리에이터 대시보드에서 빠르게 제출해 주세요.\n\n\
               기한 내 미제출 시 패널티가 부과됩니다.\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::VideoDeadlineToday,
        audience: Audience::Creator,
        code: "025100001015",
        name: "영상 제출 기한 당일 안내",
        params: &["크리에이터명", "캠페인명", "제출기한"],
        optional: &[],
        subject: "[CNEC] 영상 제출 마감일",
        body: "[CNEC] 참여하신 캠페인 영상 제출 마감일 안내\n\
               #{크리에이터명}님, 신청하신 캠페인의 영상 제출 기한이 오늘입니다.\n\n\
               캠페인: #{캠페인명}\n\
               영상 제출 기한: #{제출기한} (오늘)\n\n\
               아직 영상이 제출되지 않았습니다. 오늘 자정까지 크리에이터 대시보드에서 제출해 주세요.\n\n\
               기한 내 미제출 시 패널티가 부과됩니다.\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::VideoRevisionRequested,
        audience: Audience::Creator,
        code: "025100001016",
        name: "영상 수정 요청 알림",
        params: &["크리에이터명", "캠페인명", "요청일", "재제출기한"],
        optional: &[],
        subject: "[CNEC] 영상 수정 요청",
        body: "[CNEC] 제출하신 영상 수정 요청\n\
               #{크리에이터명}님, 제출하신 영상에 수정 요청이 있습니다.\n\n\
               캠페인: #{캠페인명}\n\
               수정 요청일: #{요청일}\n\n\
               크리에이터 대시보드에서 수정 사항을 확인하시고, 영상을 수정하여 재제출해 주세요.\n\n\
               재제출 기한: #{재제출기한}\n\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::VideoApproved,
        audience: Audience::Creator,
        code: "025100001017",
        name: "영상 승인 완료",
        params: &["크리에이터명", "캠페인명", "업로드기한"],
        optional: &[],
        subject: "[CNEC] 영상 승인 완료",
        body: "[CNEC] 제출하신 영상 승인 완료\n\
               #{크리에이터명}님, 제출하신 영상이 승인되었습니다.\n\
               캠페인: #{캠페인명}\n\
               SNS 업로드 기한: #{업로드기한}\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::CampaignRewardPaid,
        audience: Audience::Creator,
        code: "025100001018",
        name: "캠페인 완료 포인트 지급 알림",
        params: &["크리에이터명", "캠페인명", "완료일"],
        optional: &[],
        subject: "[CNEC] 캠페인 완료 및 포인트 지급",
        body: "[CNEC] 캠페인 완료 및 포인트 지급\n\
               #{크리에이터명}님, #{캠페인명} 캠페인이 완료되었습니다!\n\
               완료일: #{완료일}\n\
               포인트가 지급되었습니다. 대시보드에서 확인하세요.\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::WithdrawalRequested,
        audience: Audience::Creator,
        code: "025100001019",
        name: "출금 접수 완료",
        params: &["크리에이터명", "출금금액", "신청일"],
        optional: &[],
        subject: "[CNEC] 출금 신청 접수",
        body: "[CNEC] 출금 신청 접수\n\
               #{크리에이터명}님, 출금 신청이 접수되었습니다.\n\
               출금 금액: #{출금금액}원\n\
               신청일: #{신청일}\n\
               영업일 기준 3-5일 내 입금 예정입니다.\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::WithdrawalCompleted,
        audience: Audience::Creator,
        code: "025100001020",
        name: "출금 완료 알림",
        params: &["크리에이터명", "입금일"],
        optional: &[],
        subject: "[CNEC] 출금 완료",
        body: "[CNEC] 출금 완료\n\
               #{크리에이터명}님, 출금이 완료되었습니다.\n\
               입금일: #{입금일}\n\
               계좌를 확인해 주세요. 감사합니다.\n\
               문의: 1833-6025",
    },
    AlimtalkTemplate {
        event: NotificationEvent::DeadlineOverdue,
        audience: Audience::Creator,
        code: "025100001021",
        name: "캠페인 제출 기한 지연",
        params: &["크리에이터명", "캠페인명", "제출기한"],
        optional: &[],
        subject: "[CNEC] 제출 기한 지연 안내",
        body: "[CNEC] 캠페인 제출 기한 지연 안내\n\
               #{크리에이터명}님, 참여하신 캠페인의 영상 제출 기한이 지났습니다.\n\
               캠페인: #{캠페인명}\n\
               영상 제출 기한: #{제출기한}\n\
               빠른 시일 내 제출해 주세요. 지연 시 패널티가 부과됩니다.\n\
               문의: 1833-6025",
    },
];
