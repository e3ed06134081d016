//! Kafka protocol error codes, decoded into descriptive errors
//!
//! See: <https://kafka.apache.org/protocol.html#protocol_error_codes>

use thiserror::Error;

/// Kafka protocol error codes that a DescribeConfigs (or other admin) response can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum KafkaErrorCode {
    UnknownServerError = -1,
    OffsetOutOfRange = 1,
    CorruptMessage = 2,
    UnknownTopicOrPartition = 3,
    InvalidFetchSize = 4,
    LeaderNotAvailable = 5,
    NotLeaderOrFollower = 6,
    RequestTimedOut = 7,
    BrokerNotAvailable = 8,
    ReplicaNotAvailable = 9,
    MessageTooLarge = 10,
    StaleControllerEpoch = 11,
    OffsetMetadataTooLarge = 12,
    NetworkException = 13,
    CoordinatorLoadInProgress = 14,
    CoordinatorNotAvailable = 15,
    NotCoordinator = 16,
    InvalidTopicException = 17,
    RecordListTooLarge = 18,
    NotEnoughReplicas = 19,
    NotEnoughReplicasAfterAppend = 20,
    InvalidRequiredAcks = 21,
    IllegalGeneration = 22,
    TopicAuthorizationFailed = 29,
    GroupAuthorizationFailed = 30,
    ClusterAuthorizationFailed = 31,
    UnsupportedSaslMechanism = 33,
    IllegalSaslState = 34,
    UnsupportedVersion = 35,
    TopicAlreadyExists = 36,
    InvalidPartitions = 37,
    InvalidReplicationFactor = 38,
    InvalidReplicaAssignment = 39,
    InvalidConfig = 40,
    NotController = 41,
    InvalidRequest = 42,
    PolicyViolation = 44,
    SecurityDisabled = 54,
    KafkaStorageError = 56,
    LogDirNotFound = 57,
    SaslAuthenticationFailed = 58,
    ReassignmentInProgress = 60,
    ThrottlingQuotaExceeded = 89,
    ResourceNotFound = 91,
    DuplicateResource = 92,
    InvalidUpdateVersion = 95,
    UnknownTopicId = 100,
    BrokerIdNotRegistered = 102,
}

impl KafkaErrorCode {
    /// `0` is "no error" and maps to `None`, as does any code this table does not know
    pub fn from_i16(code: i16) -> Option<Self> {
        use KafkaErrorCode::*;
        let known = match code {
            -1 => UnknownServerError,
            1 => OffsetOutOfRange,
            2 => CorruptMessage,
            3 => UnknownTopicOrPartition,
            4 => InvalidFetchSize,
            5 => LeaderNotAvailable,
            6 => NotLeaderOrFollower,
            7 => RequestTimedOut,
            8 => BrokerNotAvailable,
            9 => ReplicaNotAvailable,
            10 => MessageTooLarge,
            11 => StaleControllerEpoch,
            12 => OffsetMetadataTooLarge,
            13 => NetworkException,
            14 => CoordinatorLoadInProgress,
            15 => CoordinatorNotAvailable,
            16 => NotCoordinator,
            17 => InvalidTopicException,
            18 => RecordListTooLarge,
            19 => NotEnoughReplicas,
            20 => NotEnoughReplicasAfterAppend,
            21 => InvalidRequiredAcks,
            22 => IllegalGeneration,
            29 => TopicAuthorizationFailed,
            30 => GroupAuthorizationFailed,
            31 => ClusterAuthorizationFailed,
            33 => UnsupportedSaslMechanism,
            34 => IllegalSaslState,
            35 => UnsupportedVersion,
            36 => TopicAlreadyExists,
            37 => InvalidPartitions,
            38 => InvalidReplicationFactor,
            39 => InvalidReplicaAssignment,
            40 => InvalidConfig,
            41 => NotController,
            42 => InvalidRequest,
            44 => PolicyViolation,
            54 => SecurityDisabled,
            56 => KafkaStorageError,
            57 => LogDirNotFound,
            58 => SaslAuthenticationFailed,
            60 => ReassignmentInProgress,
            89 => ThrottlingQuotaExceeded,
            91 => ResourceNotFound,
            92 => DuplicateResource,
            95 => InvalidUpdateVersion,
            100 => UnknownTopicId,
            102 => BrokerIdNotRegistered,
            _ => return None,
        };
        Some(known)
    }

    pub fn as_i16(&self) -> i16 {
        *self as i16
    }

    pub fn name(&self) -> &'static str {
        use KafkaErrorCode::*;
        match self {
            UnknownServerError => "UNKNOWN_SERVER_ERROR",
            OffsetOutOfRange => "OFFSET_OUT_OF_RANGE",
            CorruptMessage => "CORRUPT_MESSAGE",
            UnknownTopicOrPartition => "UNKNOWN_TOPIC_OR_PARTITION",
            InvalidFetchSize => "INVALID_FETCH_SIZE",
            LeaderNotAvailable => "LEADER_NOT_AVAILABLE",
            NotLeaderOrFollower => "NOT_LEADER_OR_FOLLOWER",
            RequestTimedOut => "REQUEST_TIMED_OUT",
            BrokerNotAvailable => "BROKER_NOT_AVAILABLE",
            ReplicaNotAvailable => "REPLICA_NOT_AVAILABLE",
            MessageTooLarge => "MESSAGE_TOO_LARGE",
            StaleControllerEpoch => "STALE_CONTROLLER_EPOCH",
            OffsetMetadataTooLarge => "OFFSET_METADATA_TOO_LARGE",
            NetworkException => "NETWORK_EXCEPTION",
            CoordinatorLoadInProgress => "COORDINATOR_LOAD_IN_PROGRESS",
            CoordinatorNotAvailable => "COORDINATOR_NOT_AVAILABLE",
            NotCoordinator => "NOT_COORDINATOR",
            InvalidTopicException => "INVALID_TOPIC_EXCEPTION",
            RecordListTooLarge => "RECORD_LIST_TOO_LARGE",
            NotEnoughReplicas => "NOT_ENOUGH_REPLICAS",
            NotEnoughReplicasAfterAppend => "NOT_ENOUGH_REPLICAS_AFTER_APPEND",
            InvalidRequiredAcks => "INVALID_REQUIRED_ACKS",
            IllegalGeneration => "ILLEGAL_GENERATION",
            TopicAuthorizationFailed => "TOPIC_AUTHORIZATION_FAILED",
            GroupAuthorizationFailed => "GROUP_AUTHORIZATION_FAILED",
            ClusterAuthorizationFailed => "CLUSTER_AUTHORIZATION_FAILED",
            UnsupportedSaslMechanism => "UNSUPPORTED_SASL_MECHANISM",
            IllegalSaslState => "ILLEGAL_SASL_STATE",
            UnsupportedVersion => "UNSUPPORTED_VERSION",
            TopicAlreadyExists => "TOPIC_ALREADY_EXISTS",
            InvalidPartitions => "INVALID_PARTITIONS",
            InvalidReplicationFactor => "INVALID_REPLICATION_FACTOR",
            InvalidReplicaAssignment => "INVALID_REPLICA_ASSIGNMENT",
            InvalidConfig => "INVALID_CONFIG",
            NotController => "NOT_CONTROLLER",
            InvalidRequest => "INVALID_REQUEST",
            PolicyViolation => "POLICY_VIOLATION",
            SecurityDisabled => "SECURITY_DISABLED",
            KafkaStorageError => "KAFKA_STORAGE_ERROR",
            LogDirNotFound => "LOG_DIR_NOT_FOUND",
            SaslAuthenticationFailed => "SASL_AUTHENTICATION_FAILED",
            ReassignmentInProgress => "REASSIGNMENT_IN_PROGRESS",
            ThrottlingQuotaExceeded => "THROTTLING_QUOTA_EXCEEDED",
            ResourceNotFound => "RESOURCE_NOT_FOUND",
            DuplicateResource => "DUPLICATE_RESOURCE",
            InvalidUpdateVersion => "INVALID_UPDATE_VERSION",
            UnknownTopicId => "UNKNOWN_TOPIC_ID",
            BrokerIdNotRegistered => "BROKER_ID_NOT_REGISTERED",
        }
    }

    pub fn description(&self) -> &'static str {
        use KafkaErrorCode::*;
        match self {
            UnknownServerError => {
                "The server experienced an unexpected error when processing the request."
            }
            OffsetOutOfRange => "The requested offset is not within the range of offsets maintained by the server.",
            CorruptMessage => "This message has failed its CRC checksum, exceeds the valid size, has a null key for a compacted topic, or is otherwise corrupt.",
            UnknownTopicOrPartition => "This server does not host this topic-partition.",
            InvalidFetchSize => "The requested fetch size is invalid.",
            LeaderNotAvailable => "There is no leader for this topic-partition as we are in the middle of a leadership election.",
            NotLeaderOrFollower => "For requests intended only for the leader, this error indicates that the broker is not the current leader.",
            RequestTimedOut => "The request timed out.",
            BrokerNotAvailable => "The broker is not available.",
            ReplicaNotAvailable => "The replica is not available for the requested topic-partition.",
            MessageTooLarge => "The request included a message larger than the max message size the server will accept.",
            StaleControllerEpoch => "The controller moved to another broker.",
            OffsetMetadataTooLarge => "The metadata field of the offset request was too large.",
            NetworkException => "The server disconnected before a response was received.",
            CoordinatorLoadInProgress => "The coordinator is loading and hence can't process requests.",
            CoordinatorNotAvailable => "The coordinator is not available.",
            NotCoordinator => "This is not the correct coordinator.",
            InvalidTopicException => "The request attempted to perform an operation on an invalid topic.",
            RecordListTooLarge => "The request included message batch larger than the configured segment size on the server.",
            NotEnoughReplicas => "Messages are rejected since there are fewer in-sync replicas than required.",
            NotEnoughReplicasAfterAppend => "Messages are written to the log, but to fewer in-sync replicas than required.",
            InvalidRequiredAcks => "Produce request specified an invalid value for required acks.",
            IllegalGeneration => "Specified group generation id is not valid.",
            TopicAuthorizationFailed => "Topic authorization failed.",
            GroupAuthorizationFailed => "Group authorization failed.",
            ClusterAuthorizationFailed => "Cluster authorization failed.",
            UnsupportedSaslMechanism => "The broker does not support the requested SASL mechanism.",
            IllegalSaslState => "Request is not valid given the current SASL state.",
            UnsupportedVersion => "The version of API is not supported.",
            TopicAlreadyExists => "Topic with this name already exists.",
            InvalidPartitions => "Number of partitions is below 1.",
            InvalidReplicationFactor => "Replication factor is below 1 or larger than the number of available brokers.",
            InvalidReplicaAssignment => "Replica assignment is invalid.",
            InvalidConfig => "Configuration is invalid.",
            NotController => "This is not the correct controller for this cluster.",
            InvalidRequest => "This most likely occurs because of a request being malformed by the client library or the message was sent to an incompatible broker.",
            PolicyViolation => "Request parameters do not satisfy the configured policy.",
            SecurityDisabled => "Security features are disabled.",
            KafkaStorageError => "Disk error when trying to access log file on the disk.",
            LogDirNotFound => "The user-specified log directory is not found in the broker config.",
            SaslAuthenticationFailed => "SASL Authentication failed.",
            ReassignmentInProgress => "A partition reassignment is in progress.",
            ThrottlingQuotaExceeded => "The throttling quota has been exceeded.",
            ResourceNotFound => "A request illegally referred to a resource that does not exist.",
            DuplicateResource => "A request illegally referred to the same resource twice.",
            InvalidUpdateVersion => "The given update version was invalid.",
            UnknownTopicId => "This server does not host this topic ID.",
            BrokerIdNotRegistered => "The given broker ID was not registered.",
        }
    }

    /// Returns true if this error is retriable
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            KafkaErrorCode::CorruptMessage
                | KafkaErrorCode::UnknownTopicOrPartition
                | KafkaErrorCode::LeaderNotAvailable
                | KafkaErrorCode::NotLeaderOrFollower
                | KafkaErrorCode::RequestTimedOut
                | KafkaErrorCode::ReplicaNotAvailable
                | KafkaErrorCode::NetworkException
                | KafkaErrorCode::CoordinatorLoadInProgress
                | KafkaErrorCode::CoordinatorNotAvailable
                | KafkaErrorCode::NotCoordinator
                | KafkaErrorCode::NotEnoughReplicas
                | KafkaErrorCode::NotEnoughReplicasAfterAppend
                | KafkaErrorCode::KafkaStorageError
                | KafkaErrorCode::ThrottlingQuotaExceeded
        )
    }
}

/// A non-zero protocol error code reported inside an otherwise successful response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {description}")]
pub struct KafkaProtocolError {
    pub code: i16,
    pub name: String,
    pub description: String,
    pub retriable: bool,
}

impl KafkaProtocolError {
    /// `Ok(())` for code 0, otherwise the decoded error. Codes outside the table are
    /// still reported, never dropped.
    pub fn check(code: i16) -> Result<(), KafkaProtocolError> {
        if code == 0 {
            return Ok(());
        }

        Err(match KafkaErrorCode::from_i16(code) {
            Some(known) => KafkaProtocolError {
                code,
                name: known.name().to_string(),
                description: known.description().to_string(),
                retriable: known.is_retriable(),
            },
            None => KafkaProtocolError {
                code,
                name: format!("UNKNOWN_ERROR_CODE_{code}"),
                description: "The broker returned an error code this console does not recognise."
                    .to_string(),
                retriable: false,
            },
        })
    }

    /// Appends the broker-supplied error message when there is one
    pub fn with_broker_message(mut self, message: Option<&str>) -> Self {
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            self.description = format!("{} ({message})", self.description);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_not_an_error() {
        assert!(KafkaProtocolError::check(0).is_ok());
        assert!(KafkaErrorCode::from_i16(0).is_none());
    }

    #[test]
    fn test_known_code_decodes() {
        let err = KafkaProtocolError::check(31).unwrap_err();
        assert_eq!(err.code, 31);
        assert_eq!(err.name, "CLUSTER_AUTHORIZATION_FAILED");
        assert_eq!(
            err.to_string(),
            "CLUSTER_AUTHORIZATION_FAILED: Cluster authorization failed."
        );
        assert!(!err.retriable);
    }

    #[test]
    fn test_unknown_code_is_still_an_error() {
        let err = KafkaProtocolError::check(999).unwrap_err();
        assert_eq!(err.code, 999);
        assert_eq!(err.name, "UNKNOWN_ERROR_CODE_999");
    }

    #[test]
    fn test_round_trip_codes() {
        for code in [-1i16, 7, 35, 42, 102] {
            let known = KafkaErrorCode::from_i16(code).unwrap();
            assert_eq!(known.as_i16(), code);
        }
    }

    #[test]
    fn test_broker_message_appended() {
        let err = KafkaProtocolError::check(40)
            .unwrap_err()
            .with_broker_message(Some("bad key"));
        assert!(err.to_string().ends_with("(bad key)"));

        let err = KafkaProtocolError::check(40)
            .unwrap_err()
            .with_broker_message(Some(""));
        assert_eq!(err.to_string(), "INVALID_CONFIG: Configuration is invalid.");
    }

    #[test]
    fn test_retriable() {
        assert!(KafkaErrorCode::RequestTimedOut.is_retriable());
        assert!(!KafkaErrorCode::InvalidConfig.is_retriable());
    }
}
